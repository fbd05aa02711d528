/// Named access to `ProteinRecord` fields for selection, grouping and patching
use crate::bio::record::ProteinRecord;
use crate::bio::taxonomy::Division;
use crate::{Result, TerpenomeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Accession,
    SourceDatabase,
    RawHeader,
    Reviewed,
    ProteinName,
    TaxonomyId,
    OrganismName,
    OrganismDivision,
    EnzymeTypes,
}

impl RecordField {
    pub const ALL: [RecordField; 9] = [
        RecordField::Accession,
        RecordField::SourceDatabase,
        RecordField::RawHeader,
        RecordField::Reviewed,
        RecordField::ProteinName,
        RecordField::TaxonomyId,
        RecordField::OrganismName,
        RecordField::OrganismDivision,
        RecordField::EnzymeTypes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RecordField::Accession => "accession",
            RecordField::SourceDatabase => "source_database",
            RecordField::RawHeader => "raw_header",
            RecordField::Reviewed => "reviewed",
            RecordField::ProteinName => "protein_name",
            RecordField::TaxonomyId => "taxonomy_id",
            RecordField::OrganismName => "organism_name",
            RecordField::OrganismDivision => "organism_division",
            RecordField::EnzymeTypes => "enzyme_types",
        }
    }

    /// Values of this field as strings. Unset optional fields yield no values,
    /// `enzyme_types` yields one value per label.
    pub fn values(&self, record: &ProteinRecord) -> Vec<String> {
        match self {
            RecordField::Accession => vec![record.accession().to_string()],
            RecordField::SourceDatabase => vec![record.source_database().to_string()],
            RecordField::RawHeader => vec![record.raw_header().to_string()],
            RecordField::Reviewed => record.reviewed().map(|r| r.to_string()).into_iter().collect(),
            RecordField::ProteinName => vec![record.protein_name().to_string()],
            RecordField::TaxonomyId => record
                .taxonomy_id()
                .map(|id| id.to_string())
                .into_iter()
                .collect(),
            RecordField::OrganismName => {
                if record.organism_name().is_empty() {
                    Vec::new()
                } else {
                    vec![record.organism_name().to_string()]
                }
            }
            RecordField::OrganismDivision => record
                .organism_division()
                .map(|d| d.to_string())
                .into_iter()
                .collect(),
            RecordField::EnzymeTypes => record.enzyme_types().iter().cloned().collect(),
        }
    }

    /// Whether `patch` may change this field
    pub fn is_mutable(&self) -> bool {
        !matches!(
            self,
            RecordField::Accession | RecordField::SourceDatabase | RecordField::RawHeader
        )
    }

    /// Set this field on `record` from its text form (manual metadata patches)
    pub fn patch(&self, record: &mut ProteinRecord, value: &str) -> Result<()> {
        let value = value.trim();
        match self {
            RecordField::Accession | RecordField::SourceDatabase | RecordField::RawHeader => {
                return Err(TerpenomeError::InvalidInput(format!(
                    "Field '{}' cannot be changed",
                    self
                )))
            }
            RecordField::Reviewed => record.set_reviewed(Some(parse_bool(value)?)),
            RecordField::ProteinName => record.set_protein_name(value.to_string()),
            RecordField::TaxonomyId => {
                let id = value.parse::<u32>().map_err(|_| {
                    TerpenomeError::InvalidInput(format!("Invalid taxonomy id '{}'", value))
                })?;
                record.set_taxonomy_id(Some(id));
            }
            RecordField::OrganismName => {
                record.set_organism(value.to_string(), record.organism_division())
            }
            RecordField::OrganismDivision => {
                let division = value.parse::<Division>()?;
                let name = record.organism_name().to_string();
                record.set_organism(name, Some(division));
            }
            RecordField::EnzymeTypes => record.set_enzyme_types(value.split(',')),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "reviewed" => Ok(true),
        "false" | "no" | "0" | "unreviewed" => Ok(false),
        _ => Err(TerpenomeError::InvalidInput(format!(
            "Expected a boolean, found '{}'",
            value
        ))),
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordField {
    type Err = TerpenomeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        RecordField::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| TerpenomeError::UnknownField(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::record::SourceDatabase;
    use pretty_assertions::assert_eq;

    fn record() -> ProteinRecord {
        ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A1|reviewed|Kaurene synthase|taxID:5062",
        )
        .unwrap()
    }

    #[test]
    fn test_from_str() {
        assert_eq!("protein_name".parse::<RecordField>().unwrap(), RecordField::ProteinName);
        for field in RecordField::ALL {
            assert_eq!(field.name().parse::<RecordField>().unwrap(), field);
        }
        assert!(matches!(
            "nope".parse::<RecordField>(),
            Err(TerpenomeError::UnknownField(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_values() {
        let mut record = record();
        assert_eq!(RecordField::Accession.values(&record), vec!["A0A1"]);
        assert_eq!(RecordField::Reviewed.values(&record), vec!["true"]);
        assert_eq!(RecordField::TaxonomyId.values(&record), vec!["5062"]);
        assert!(RecordField::OrganismName.values(&record).is_empty());
        assert!(RecordField::EnzymeTypes.values(&record).is_empty());

        record.set_enzyme_types(["diterpene synthase", "GGPP synthase"]);
        assert_eq!(
            RecordField::EnzymeTypes.values(&record),
            vec!["GGPP synthase", "diterpene synthase"]
        );
    }

    #[test]
    fn test_patch() {
        let mut record = record();
        RecordField::OrganismDivision.patch(&mut record, "Ascomycota").unwrap();
        RecordField::OrganismName.patch(&mut record, "Aspergillus").unwrap();
        RecordField::EnzymeTypes
            .patch(&mut record, "sesquiterpene synthase, FPP synthase")
            .unwrap();
        RecordField::Reviewed.patch(&mut record, "no").unwrap();

        assert_eq!(record.organism_division(), Some(Division::Ascomycota));
        assert_eq!(record.organism_name(), "Aspergillus");
        assert_eq!(record.enzyme_types().len(), 2);
        assert_eq!(record.reviewed(), Some(false));

        assert!(RecordField::Accession.patch(&mut record, "X").is_err());
        assert!(RecordField::TaxonomyId.patch(&mut record, "abc").is_err());
    }
}
