/// Record selection by field values
use crate::bio::field::RecordField;
use crate::bio::record::ProteinRecord;
use crate::bio::sequence::Sequence;
use crate::report::read_mapping_file;
use crate::{Result, TerpenomeError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Accepted value as written in a selection file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AcceptedValue {
    Text(String),
    Flag(bool),
    Number(i64),
}

impl AcceptedValue {
    fn into_string(self) -> String {
        match self {
            AcceptedValue::Text(s) => s,
            AcceptedValue::Flag(b) => b.to_string(),
            AcceptedValue::Number(n) => n.to_string(),
        }
    }
}

/// Field name to accepted values. Every field must match; within a field any value does.
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    criteria: IndexMap<RecordField, BTreeSet<String>>,
}

impl SelectionCriteria {
    pub fn new<I, S>(criteria: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: AsRef<str>,
    {
        let mut map: IndexMap<RecordField, BTreeSet<String>> = IndexMap::new();
        for (name, values) in criteria {
            let field: RecordField = name.as_ref().parse()?;
            map.entry(field).or_default().extend(values);
        }
        if map.is_empty() {
            return Err(TerpenomeError::InvalidInput(
                "Selection defines no criteria".to_string(),
            ));
        }
        Ok(Self { criteria: map })
    }

    /// Load criteria from a TOML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw: IndexMap<String, Vec<AcceptedValue>> = read_mapping_file(path)?;
        Self::new(raw.into_iter().map(|(name, values)| {
            (
                name,
                values.into_iter().map(AcceptedValue::into_string).collect(),
            )
        }))
    }

    pub fn fields(&self) -> impl Iterator<Item = &RecordField> {
        self.criteria.keys()
    }

    pub fn matches(&self, record: &ProteinRecord) -> bool {
        self.criteria.iter().all(|(field, accepted)| {
            field
                .values(record)
                .iter()
                .any(|value| accepted.contains(value))
        })
    }

    /// Accessions of the matching records
    pub fn select<'a, I>(&self, records: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a ProteinRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .map(|record| record.accession().to_string())
            .collect()
    }
}

/// Keep sequences whose header accession is in `accessions`
pub fn filter_sequences(sequences: Vec<Sequence>, accessions: &BTreeSet<String>) -> Vec<Sequence> {
    sequences
        .into_iter()
        .filter(|seq| accessions.contains(seq.accession()))
        .collect()
}

/// Outcome of selecting sequences by an accession list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSelection {
    pub sequences: Vec<Sequence>,
    pub duplicates: usize,
}

/// Keep (or with `exclude`, drop) sequences whose accession or id is listed.
/// A selected sequence identical to one already kept is skipped.
pub fn select_by_ids(
    sequences: Vec<Sequence>,
    ids: &HashSet<String>,
    exclude: bool,
) -> IdSelection {
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut selection = IdSelection::default();
    for seq in sequences {
        let listed = ids.contains(seq.accession()) || ids.contains(&seq.id);
        if listed == exclude {
            continue;
        }
        if !seen.insert(seq.sequence.clone()) {
            tracing::info!("Skipped duplicate sequence {}", seq.id);
            selection.duplicates += 1;
            continue;
        }
        selection.sequences.push(seq);
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::record::SourceDatabase;
    use crate::bio::taxonomy::Division;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    fn record(header: &str, labels: &[&str], division: Division) -> ProteinRecord {
        let mut record = ProteinRecord::from_header(SourceDatabase::Interpro, header).unwrap();
        record.set_enzyme_types(labels.iter().copied());
        record.set_organism("Aspergillus".to_string(), Some(division));
        record
    }

    fn records() -> Vec<ProteinRecord> {
        vec![
            record(
                "A1|reviewed|x|taxID:1",
                &["diterpene synthase", "GGPP synthase"],
                Division::Ascomycota,
            ),
            record("B2|unreviewed|x|taxID:1", &["diterpene synthase"], Division::Basidiomycota),
            record("C3|reviewed|x|taxID:1", &["sesquiterpene synthase"], Division::Ascomycota),
        ]
    }

    #[test]
    fn test_all_fields_must_match() {
        let criteria = SelectionCriteria::new([
            ("enzyme_types", vec!["diterpene synthase".to_string()]),
            ("organism_division", vec!["Ascomycota".to_string()]),
        ])
        .unwrap();
        let selected: Vec<String> = criteria.select(&records()).into_iter().collect();
        assert_eq!(selected, vec!["A1"]);
    }

    #[test]
    fn test_any_value_within_field() {
        let criteria = SelectionCriteria::new([(
            "enzyme_types",
            vec!["GGPP synthase".to_string(), "sesquiterpene synthase".to_string()],
        )])
        .unwrap();
        let selected: Vec<String> = criteria.select(&records()).into_iter().collect();
        assert_eq!(selected, vec!["A1", "C3"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SelectionCriteria::new([("enzyme_class", vec!["x".to_string()])]).unwrap_err();
        assert!(matches!(err, TerpenomeError::UnknownField(name) if name == "enzyme_class"));
    }

    #[test]
    fn test_from_toml_file_with_bool_values() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "reviewed = [true]\norganism_division = [\"Ascomycota\"]").unwrap();
        let criteria = SelectionCriteria::from_file(file.path()).unwrap();
        let selected: Vec<String> = criteria.select(&records()).into_iter().collect();
        assert_eq!(selected, vec!["A1", "C3"]);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"accession": ["B2"]}}"#).unwrap();
        let criteria = SelectionCriteria::from_file(file.path()).unwrap();
        assert_eq!(criteria.select(&records()).len(), 1);
    }

    #[test]
    fn test_filter_sequences_by_accession() {
        let sequences = vec![
            Sequence::new("A1|reviewed|x|taxID:1".to_string(), b"MKV".to_vec()),
            Sequence::new("A10|reviewed|x|taxID:1".to_string(), b"MKL".to_vec()),
        ];
        let accessions: BTreeSet<String> = ["A1".to_string()].into_iter().collect();
        let kept = filter_sequences(sequences, &accessions);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].accession(), "A1");
    }

    #[test]
    fn test_select_by_ids_skips_duplicates() {
        let sequences = vec![
            Sequence::new("sp|P1|A_ASPFU".to_string(), b"MKV".to_vec()),
            Sequence::new("P2".to_string(), b"MKV".to_vec()),
            Sequence::new("P3".to_string(), b"MKL".to_vec()),
        ];
        let ids: HashSet<String> = ["P1", "P2"].iter().map(|s| s.to_string()).collect();

        let selection = select_by_ids(sequences.clone(), &ids, false);
        assert_eq!(selection.sequences.len(), 1);
        assert_eq!(selection.sequences[0].accession(), "P1");
        assert_eq!(selection.duplicates, 1);

        let excluded = select_by_ids(sequences, &ids, true);
        assert_eq!(excluded.sequences.len(), 1);
        assert_eq!(excluded.sequences[0].id, "P3");
        assert_eq!(excluded.duplicates, 0);
    }
}
