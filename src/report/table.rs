/// Delimited metadata table export
use crate::bio::record::ProteinRecord;
use crate::Result;
use serde::Serialize;
use std::io::Write;

pub const LABEL_SEPARATOR: &str = "; ";

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    accession: &'a str,
    source_database: String,
    protein_name: &'a str,
    enzyme_types: String,
    organism_name: &'a str,
    organism_division: String,
    reviewed: String,
}

impl<'a> TableRow<'a> {
    fn from_record(record: &'a ProteinRecord) -> Self {
        Self {
            accession: record.accession(),
            source_database: record.source_database().to_string(),
            protein_name: record.protein_name(),
            enzyme_types: record
                .enzyme_types()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(LABEL_SEPARATOR),
            organism_name: record.organism_name(),
            organism_division: record
                .organism_division()
                .map(|d| d.to_string())
                .unwrap_or_default(),
            reviewed: record.reviewed().map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

/// Write one row per record, ordered by accession, with a header row
pub fn write_table<W: Write>(writer: W, records: &[ProteinRecord], delimiter: u8) -> Result<usize> {
    let mut sorted: Vec<&ProteinRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.accession().cmp(b.accession()));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(writer);
    for record in &sorted {
        writer.serialize(TableRow::from_record(record))?;
    }
    // An empty table still gets its header
    if sorted.is_empty() {
        writer.write_record([
            "accession",
            "source_database",
            "protein_name",
            "enzyme_types",
            "organism_name",
            "organism_division",
            "reviewed",
        ])?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} table rows", sorted.len());
    Ok(sorted.len())
}
