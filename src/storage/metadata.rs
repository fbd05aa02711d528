/// Manual metadata patches read from a TSV file and applied to stored records
use crate::bio::field::RecordField;
use crate::bio::record::ProteinRecord;
use crate::bio::taxonomy::{Division, DivisionRule};
use crate::storage::RecordStore;
use crate::{Result, TerpenomeError};
use std::path::Path;

pub const LINEAGE_COLUMN: &str = "lineage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataColumn {
    Field(RecordField),
    /// Semicolon-separated lineage names; sets the division
    Lineage,
}

impl MetadataColumn {
    fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name == LINEAGE_COLUMN {
            return Ok(MetadataColumn::Lineage);
        }
        let field: RecordField = name.parse()?;
        if !field.is_mutable() {
            return Err(TerpenomeError::InvalidInput(format!(
                "Column '{}' cannot be patched",
                name
            )));
        }
        Ok(MetadataColumn::Field(field))
    }
}

/// One row of the metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPatch {
    pub accession: String,
    pub values: Vec<(MetadataColumn, String)>,
}

impl MetadataPatch {
    /// Patch `record`; a lineage column is resolved against `rules` in order
    pub fn apply(&self, record: &mut ProteinRecord, rules: &[DivisionRule]) -> Result<()> {
        for (column, value) in &self.values {
            match column {
                MetadataColumn::Field(field) => field.patch(record, value)?,
                MetadataColumn::Lineage => {
                    let names: Vec<&str> = value
                        .split(|c: char| c == ';' || c == ',')
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .collect();
                    let division = Division::from_lineage_names(&names, rules);
                    let organism_name = record.organism_name().to_string();
                    record.set_organism(organism_name, Some(division));
                }
            }
        }
        Ok(())
    }
}

/// Decode text that may be UTF-16 with a byte order mark (spreadsheet exports)
fn decode_text(bytes: &[u8]) -> Result<String> {
    let decode_utf16 = |data: &[u8], little_endian: bool| -> Result<String> {
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|pair| {
                if little_endian {
                    u16::from_le_bytes([pair[0], pair[1]])
                } else {
                    u16::from_be_bytes([pair[0], pair[1]])
                }
            })
            .collect();
        String::from_utf16(&units)
            .map_err(|e| TerpenomeError::Parse(format!("Invalid UTF-16 text: {}", e)))
    };

    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, true),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, false),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| TerpenomeError::Parse(format!("Invalid UTF-8 text: {}", e))),
        _ => String::from_utf8(bytes.to_vec())
            .map_err(|e| TerpenomeError::Parse(format!("Invalid UTF-8 text: {}", e))),
    }
}

/// Parse a metadata TSV whose first column is `accession`
pub fn parse_metadata(text: &str) -> Result<Vec<MetadataPatch>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.get(0).map(str::trim) != Some("accession") {
        return Err(TerpenomeError::InvalidInput(
            "First metadata column must be 'accession'".to_string(),
        ));
    }
    let columns: Vec<MetadataColumn> = headers
        .iter()
        .skip(1)
        .map(MetadataColumn::parse)
        .collect::<Result<_>>()?;

    let mut patches = Vec::new();
    for row in reader.records() {
        let row = row?;
        let accession = row.get(0).unwrap_or("").trim();
        if accession.is_empty() {
            tracing::warn!("Skipping metadata row without accession");
            continue;
        }
        let values = columns
            .iter()
            .zip(row.iter().skip(1))
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(column, value)| (*column, value.trim().to_string()))
            .collect();
        patches.push(MetadataPatch {
            accession: accession.to_string(),
            values,
        });
    }
    Ok(patches)
}

pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<Vec<MetadataPatch>> {
    let bytes = std::fs::read(path)?;
    parse_metadata(&decode_text(&bytes)?)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchSummary {
    pub updated: usize,
    pub created: usize,
}

/// Apply patches to the store; missing documents are created as reviewed ncbi records
pub fn apply_metadata(
    store: &RecordStore,
    patches: &[MetadataPatch],
    rules: &[DivisionRule],
) -> Result<PatchSummary> {
    let mut summary = PatchSummary::default();
    for patch in patches {
        let mut record = match store.try_read(&patch.accession)? {
            Some(record) => {
                summary.updated += 1;
                record
            }
            None => {
                tracing::info!("No document for {}, creating one", patch.accession);
                summary.created += 1;
                ProteinRecord::manual(&patch.accession)
            }
        };
        patch.apply(&mut record, rules)?;
        store.write(&record)?;
    }
    Ok(summary)
}
