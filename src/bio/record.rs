/// Protein records parsed from provenance-specific FASTA headers
use crate::bio::taxonomy::{Annotator, Division, TaxonomyLookup};
use crate::classify::Classifier;
use crate::{Result, TerpenomeError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// Label assigned when no enzyme family matched
pub const UNKNOWN_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceDatabase {
    Interpro,
    Uniprot,
    Ncbi,
}

impl SourceDatabase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceDatabase::Interpro => "interpro",
            SourceDatabase::Uniprot => "uniprot",
            SourceDatabase::Ncbi => "ncbi",
        }
    }
}

impl fmt::Display for SourceDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceDatabase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interpro" => Ok(SourceDatabase::Interpro),
            "uniprot" | "uniprotkb" => Ok(SourceDatabase::Uniprot),
            "ncbi" | "genbank" => Ok(SourceDatabase::Ncbi),
            _ => Err(format!("Unknown source database: {}", s)),
        }
    }
}

/// One classified protein sequence entry.
///
/// The identity fields (`source_database`, `accession`, `raw_header`) are fixed
/// at construction. Enrichment only touches the derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinRecord {
    source_database: SourceDatabase,
    accession: String,
    raw_header: String,
    reviewed: Option<bool>,
    protein_name: String,
    taxonomy_id: Option<u32>,
    #[serde(default)]
    organism_name: String,
    #[serde(default)]
    organism_division: Option<Division>,
    #[serde(default)]
    enzyme_types: BTreeSet<String>,
}

impl ProteinRecord {
    fn new(
        source_database: SourceDatabase,
        raw_header: &str,
        accession: String,
        reviewed: Option<bool>,
        protein_name: String,
        taxonomy_id: Option<u32>,
    ) -> Self {
        Self {
            source_database,
            accession,
            raw_header: raw_header.to_string(),
            reviewed,
            protein_name,
            taxonomy_id,
            organism_name: String::new(),
            organism_division: None,
            enzyme_types: BTreeSet::new(),
        }
    }

    /// Build a record from a header line (without the leading '>')
    pub fn from_header(source_database: SourceDatabase, header: &str) -> Result<Self> {
        let header = header.trim_start_matches('>').trim_end();
        match source_database {
            SourceDatabase::Interpro => parse_interpro_header(header),
            SourceDatabase::Uniprot => parse_uniprot_header(header),
            SourceDatabase::Ncbi => parse_ncbi_header(header),
        }
    }

    /// A manually curated entry that only carries an accession.
    /// It starts with the sentinel label until enzyme types are supplied.
    pub fn manual(accession: &str) -> Self {
        let mut record = Self::new(
            SourceDatabase::Ncbi,
            accession,
            accession.to_string(),
            Some(true),
            String::new(),
            None,
        );
        record.enzyme_types = BTreeSet::from([UNKNOWN_LABEL.to_string()]);
        record
    }

    pub fn source_database(&self) -> SourceDatabase {
        self.source_database
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn raw_header(&self) -> &str {
        &self.raw_header
    }

    pub fn reviewed(&self) -> Option<bool> {
        self.reviewed
    }

    pub fn protein_name(&self) -> &str {
        &self.protein_name
    }

    pub fn taxonomy_id(&self) -> Option<u32> {
        self.taxonomy_id
    }

    pub fn organism_name(&self) -> &str {
        &self.organism_name
    }

    pub fn organism_division(&self) -> Option<Division> {
        self.organism_division
    }

    pub fn enzyme_types(&self) -> &BTreeSet<String> {
        &self.enzyme_types
    }

    pub fn is_classified(&self) -> bool {
        !self.enzyme_types.is_empty()
    }

    /// Assign enzyme labels from the protein name
    pub fn classify(&mut self, classifier: &Classifier) {
        self.enzyme_types = classifier.classify(&self.protein_name, self.reviewed);
    }

    /// Assign organism name and division. Records without a taxonomy id are left untouched.
    pub fn annotate<L: TaxonomyLookup>(&mut self, annotator: &Annotator<L>) -> Result<()> {
        let Some(taxonomy_id) = self.taxonomy_id else {
            tracing::debug!("{} has no taxonomy id, skipping annotation", self.accession);
            return Ok(());
        };
        let labels = annotator.annotate(taxonomy_id)?;
        self.organism_name = labels.organism_name;
        self.organism_division = Some(labels.division);
        Ok(())
    }

    /// Replace the enzyme labels; an empty list collapses to the sentinel
    pub fn set_enzyme_types<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: BTreeSet<String> = labels
            .into_iter()
            .map(Into::into)
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        self.enzyme_types = if labels.is_empty() {
            BTreeSet::from([UNKNOWN_LABEL.to_string()])
        } else {
            labels
        };
    }

    pub fn set_organism(&mut self, organism_name: String, division: Option<Division>) {
        self.organism_name = organism_name;
        self.organism_division = division;
    }

    pub fn set_protein_name(&mut self, protein_name: String) {
        self.protein_name = protein_name;
    }

    pub fn set_reviewed(&mut self, reviewed: Option<bool>) {
        self.reviewed = reviewed;
    }

    pub fn set_taxonomy_id(&mut self, taxonomy_id: Option<u32>) {
        self.taxonomy_id = taxonomy_id;
    }
}

fn malformed(
    provenance: SourceDatabase,
    header: &str,
    reason: impl Into<String>,
) -> TerpenomeError {
    TerpenomeError::MalformedHeader {
        provenance,
        header: header.to_string(),
        reason: reason.into(),
    }
}

/// `accession|reviewed|protein name|taxID:<id>`
fn parse_interpro_header(header: &str) -> Result<ProteinRecord> {
    let provenance = SourceDatabase::Interpro;
    let fields: Vec<&str> = header.split('|').collect();
    if fields.len() < 4 {
        return Err(malformed(
            provenance,
            header,
            format!("expected at least 4 '|'-separated fields, found {}", fields.len()),
        ));
    }

    let accession = fields[0].trim();
    if accession.is_empty() {
        return Err(malformed(provenance, header, "empty accession"));
    }

    let reviewed = fields[1].trim() == "reviewed";
    // Protein names occasionally contain '|', the taxonomy token is always last
    let taxid_token = fields[fields.len() - 1].trim();
    let protein_name = fields[2..fields.len() - 1].join("|");

    let taxonomy_id = taxid_token
        .strip_prefix("taxID:")
        .ok_or_else(|| {
            malformed(
                provenance,
                header,
                format!("expected 'taxID:<id>', found '{}'", taxid_token),
            )
        })?
        .parse::<u32>()
        .map_err(|_| {
            malformed(
                provenance,
                header,
                format!("invalid taxonomy id '{}'", taxid_token),
            )
        })?;

    Ok(ProteinRecord::new(
        provenance,
        header,
        accession.to_string(),
        Some(reviewed),
        protein_name,
        Some(taxonomy_id),
    ))
}

fn uniprot_taxid_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bOX=(\d+)").ok()).as_ref()
}

/// `sp|P12345|ENTRY_NAME Protein name OS=Organism OX=9606 GN=... PE=1 SV=1`
fn parse_uniprot_header(header: &str) -> Result<ProteinRecord> {
    let provenance = SourceDatabase::Uniprot;
    let (id, description) = match header.split_once(char::is_whitespace) {
        Some((id, description)) => (id, description.trim()),
        None => (header, ""),
    };

    let fields: Vec<&str> = id.split('|').collect();
    if fields.len() < 3 {
        return Err(malformed(
            provenance,
            header,
            format!("expected 'db|accession|entry name', found {} field(s)", fields.len()),
        ));
    }

    let reviewed = match fields[0] {
        "sp" => true,
        "tr" => false,
        other => {
            return Err(malformed(
                provenance,
                header,
                format!("unknown UniProtKB section '{}'", other),
            ))
        }
    };

    let accession = fields[1].trim();
    if accession.is_empty() {
        return Err(malformed(provenance, header, "empty accession"));
    }

    let protein_name = match description.find(" OS=") {
        Some(pos) => &description[..pos],
        None => description.strip_prefix("OS=").map(|_| "").unwrap_or(description),
    };

    let taxonomy_id = match uniprot_taxid_pattern().and_then(|re| re.captures(description)) {
        Some(caps) => Some(
            caps[1].parse::<u32>().map_err(|_| {
                malformed(
                    provenance,
                    header,
                    format!("invalid taxonomy id '{}'", &caps[1]),
                )
            })?,
        ),
        None => None,
    };

    Ok(ProteinRecord::new(
        provenance,
        header,
        accession.to_string(),
        Some(reviewed),
        protein_name.trim().to_string(),
        taxonomy_id,
    ))
}

/// `ACCESSION protein name [Organism]`
const MISSING_DESCRIPTION: &str = "expected an accession followed by a description";

fn parse_ncbi_header(header: &str) -> Result<ProteinRecord> {
    let provenance = SourceDatabase::Ncbi;
    let Some((accession, description)) = header.split_once(char::is_whitespace) else {
        return Err(malformed(provenance, header, MISSING_DESCRIPTION));
    };
    let description = description.trim();
    if accession.is_empty() || description.is_empty() {
        return Err(malformed(provenance, header, MISSING_DESCRIPTION));
    }

    let protein_name = match (description.ends_with(']'), description.rfind('[')) {
        (true, Some(pos)) if pos > 0 => description[..pos].trim_end(),
        _ => description,
    };

    Ok(ProteinRecord::new(
        provenance,
        header,
        accession.to_string(),
        None,
        protein_name.to_string(),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_interpro_header() {
        let record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A2T4AB12|reviewed|Germacrene_A_synthase|taxID:5062",
        )
        .unwrap();
        assert_eq!(record.accession(), "A0A2T4AB12");
        assert_eq!(record.reviewed(), Some(true));
        assert_eq!(record.protein_name(), "Germacrene_A_synthase");
        assert_eq!(record.taxonomy_id(), Some(5062));
        assert_eq!(record.raw_header(), "A0A2T4AB12|reviewed|Germacrene_A_synthase|taxID:5062");
        assert!(!record.is_classified());
    }

    #[test]
    fn test_interpro_unreviewed_and_pipe_in_name() {
        let record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            ">Q0C|unreviewed|Terpene cyclase|fragment|taxID:33178",
        )
        .unwrap();
        assert_eq!(record.reviewed(), Some(false));
        assert_eq!(record.protein_name(), "Terpene cyclase|fragment");
        assert_eq!(record.taxonomy_id(), Some(33178));
    }

    #[test]
    fn test_interpro_header_too_few_fields() {
        let err =
            ProteinRecord::from_header(SourceDatabase::Interpro, "A0A2T4AB12|reviewed|Kaurene")
                .unwrap_err();
        assert!(matches!(err, TerpenomeError::MalformedHeader { .. }));
    }

    #[test]
    fn test_interpro_header_bad_taxid() {
        let err = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A2T4AB12|reviewed|Kaurene synthase|taxID:abc",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid taxonomy id"));

        let err = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A2T4AB12|reviewed|Kaurene synthase|5062",
        )
        .unwrap_err();
        assert!(err.to_string().contains("taxID"));
    }

    #[test]
    fn test_parse_uniprot_header() {
        let record = ProteinRecord::from_header(
            SourceDatabase::Uniprot,
            "sp|Q9UR08|ERG20_SCHPO Farnesyl pyrophosphate synthase OS=Schizosaccharomyces pombe OX=284812 GN=fps1 PE=3 SV=1",
        )
        .unwrap();
        assert_eq!(record.accession(), "Q9UR08");
        assert_eq!(record.reviewed(), Some(true));
        assert_eq!(record.protein_name(), "Farnesyl pyrophosphate synthase");
        assert_eq!(record.taxonomy_id(), Some(284812));

        let trembl = ProteinRecord::from_header(
            SourceDatabase::Uniprot,
            "tr|A0A0|A0A0_ASPNG Uncharacterized protein",
        )
        .unwrap();
        assert_eq!(trembl.reviewed(), Some(false));
        assert_eq!(trembl.taxonomy_id(), None);
        assert_eq!(trembl.protein_name(), "Uncharacterized protein");
    }

    #[test]
    fn test_uniprot_header_requires_three_fields() {
        let err =
            ProteinRecord::from_header(SourceDatabase::Uniprot, "P12345 Some protein").unwrap_err();
        assert!(matches!(
            err,
            TerpenomeError::MalformedHeader {
                provenance: SourceDatabase::Uniprot,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_ncbi_header() {
        let record = ProteinRecord::from_header(
            SourceDatabase::Ncbi,
            "XP_001390853.1 aristolochene synthase [Aspergillus niger CBS 513.88]",
        )
        .unwrap();
        assert_eq!(record.accession(), "XP_001390853.1");
        assert_eq!(record.protein_name(), "aristolochene synthase");
        assert_eq!(record.reviewed(), None);
        assert_eq!(record.taxonomy_id(), None);

        assert!(ProteinRecord::from_header(SourceDatabase::Ncbi, "XP_001390853.1").is_err());
    }

    #[test]
    fn test_set_enzyme_types_never_empty() {
        let mut record = ProteinRecord::manual("MANUAL1");
        assert_eq!(record.enzyme_types().iter().collect::<Vec<_>>(), vec!["unknown"]);
        record.set_enzyme_types(Vec::<String>::new());
        assert_eq!(record.enzyme_types().iter().collect::<Vec<_>>(), vec!["unknown"]);

        record.set_enzyme_types(["GGPP synthase", " GGPP synthase ", ""]);
        assert_eq!(record.enzyme_types().len(), 1);
        assert!(record.enzyme_types().contains("GGPP synthase"));
    }

    #[test]
    fn test_source_database_from_str() {
        assert_eq!("InterPro".parse::<SourceDatabase>().unwrap(), SourceDatabase::Interpro);
        assert_eq!("uniprotkb".parse::<SourceDatabase>().unwrap(), SourceDatabase::Uniprot);
        assert!("pdb".parse::<SourceDatabase>().is_err());
    }
}
