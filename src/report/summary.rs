/// Value counts of one record field
use crate::bio::field::RecordField;
use crate::bio::record::ProteinRecord;
use crate::Result;
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Count values of `field`, ordered by count descending then value ascending.
/// Multi-valued fields count each value once per record; records without a value
/// are counted as `none`.
pub fn count_values<'a, I>(records: I, field: RecordField) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a ProteinRecord>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let values = field.values(record);
        if values.is_empty() {
            *counts.entry("none".to_string()).or_insert(0) += 1;
        }
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut summary: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    summary
}

/// Write the counts as a two-column TSV with a header
pub fn write_summary_tsv<W: Write>(
    writer: W,
    field: RecordField,
    summary: &[ValueCount],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    writer.write_record([field.name(), "count"])?;
    for entry in summary {
        writer.write_record([entry.value.clone(), entry.count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::record::SourceDatabase;
    use pretty_assertions::assert_eq;

    fn record(accession: &str, labels: &[&str]) -> ProteinRecord {
        let mut record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            &format!("{}|reviewed|x|taxID:1", accession),
        )
        .unwrap();
        record.set_enzyme_types(labels.iter().copied());
        record
    }

    #[test]
    fn test_count_ordering() {
        let records = vec![
            record("A", &["diterpene synthase", "GGPP synthase"]),
            record("B", &["diterpene synthase"]),
            record("C", &["sesquiterpene synthase"]),
            record("D", &["GGPP synthase"]),
            record("E", &["unknown"]),
        ];
        let summary = count_values(&records, RecordField::EnzymeTypes);
        let pairs: Vec<(&str, usize)> =
            summary.iter().map(|v| (v.value.as_str(), v.count)).collect();
        assert_eq!(
            pairs,
            vec![
                ("GGPP synthase", 2),
                ("diterpene synthase", 2),
                ("sesquiterpene synthase", 1),
                ("unknown", 1),
            ]
        );
    }

    #[test]
    fn test_missing_values_counted_as_none() {
        let records = vec![record("A", &[]), record("B", &[])];
        let summary = count_values(&records, RecordField::OrganismDivision);
        assert_eq!(summary, vec![ValueCount { value: "none".to_string(), count: 2 }]);
    }

    #[test]
    fn test_write_summary_tsv() {
        let summary = vec![ValueCount { value: "Ascomycota".to_string(), count: 3 }];
        let mut buffer = Vec::new();
        write_summary_tsv(&mut buffer, RecordField::OrganismDivision, &summary).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "organism_division\tcount\nAscomycota\t3\n"
        );
    }
}
