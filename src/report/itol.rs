/// iTOL tree annotation files (labels and label background colours)
use crate::bio::field::RecordField;
use crate::bio::record::ProteinRecord;
use crate::report::read_mapping_file;
use crate::Result;
use indexmap::IndexMap;
use std::io::Write;
use std::path::Path;

/// Field value to colour, e.g. `"Ascomycota" = "#1b9e77"`
pub type ColourMap = IndexMap<String, String>;

pub fn load_colour_map<P: AsRef<Path>>(path: P) -> Result<ColourMap> {
    read_mapping_file(path)
}

pub fn write_labels<W: Write>(mut writer: W, records: &[ProteinRecord]) -> Result<()> {
    writeln!(writer, "LABELS\nSEPARATOR TAB\nDATA")?;
    for record in records {
        writeln!(writer, "{}\t{}", record.accession(), record.protein_name())?;
    }
    writer.flush()?;
    Ok(())
}

/// Colour for a record; with several values, the last one present in the map wins
pub fn record_colour<'a>(
    record: &ProteinRecord,
    group_by: RecordField,
    colours: &'a ColourMap,
) -> Option<&'a str> {
    group_by
        .values(record)
        .iter()
        .filter_map(|value| colours.get(value))
        .last()
        .map(String::as_str)
}

/// Write the colours file. Returns the number of records skipped for lack of a colour.
pub fn write_colours<W: Write>(
    mut writer: W,
    records: &[ProteinRecord],
    group_by: RecordField,
    colours: &ColourMap,
) -> Result<usize> {
    writeln!(writer, "TREE_COLORS\nSEPARATOR TAB\nDATA")?;
    let mut skipped = 0;
    for record in records {
        match record_colour(record, group_by, colours) {
            Some(colour) => {
                writeln!(writer, "{}\tlabel_background\t{}", record.accession(), colour)?;
            }
            None => {
                tracing::warn!(
                    "No colour for {} ({} = {:?}), skipping",
                    record.accession(),
                    group_by,
                    group_by.values(record)
                );
                skipped += 1;
            }
        }
    }
    writer.flush()?;
    Ok(skipped)
}
