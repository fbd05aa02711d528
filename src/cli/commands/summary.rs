use crate::bio::field::RecordField;
use crate::cli::output::{self, create_standard_table, format_number, header_cell};
use crate::core::Config;
use crate::report::summary::{count_values, write_summary_tsv};
use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use std::path::PathBuf;

#[derive(Args)]
pub struct SummaryArgs {
    /// Record field whose values are counted
    #[arg(short, long, default_value = "enzyme_types")]
    pub field: RecordField,

    /// Write the counts as TSV instead of printing a table
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory of record documents (overrides storage.record_dir)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,
}

pub fn run(args: SummaryArgs, config: &Config) -> Result<()> {
    let store = super::record_store(config, args.record_dir.as_ref());
    let records = store
        .load_all()
        .with_context(|| format!("Failed to load records from {}", store.dir().display()))?;
    let summary = count_values(&records, args.field);

    if let Some(path) = &args.output {
        let writer = super::open_output(Some(path))?;
        write_summary_tsv(writer, args.field, &summary)?;
        output::success(&format!(
            "Wrote {} {} values to {}",
            summary.len(),
            args.field,
            path.display()
        ));
        return Ok(());
    }

    output::section_header(&format!(
        "{} across {} records",
        args.field,
        format_number(records.len())
    ));
    let mut table = create_standard_table();
    table.set_header(vec![header_cell(args.field.name()), header_cell("count")]);
    for entry in &summary {
        table.add_row(vec![
            Cell::new(&entry.value),
            Cell::new(format_number(entry.count)),
        ]);
    }
    println!("{}", table);
    Ok(())
}
