use crate::bio::fasta::parse_fasta;
use crate::cli::output;
use crate::core::Config;
use crate::report::selection::{filter_sequences, SelectionCriteria};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SelectArgs {
    /// Selection file (TOML, or JSON with a .json extension) mapping fields to accepted values
    #[arg(short = 's', long, value_name = "FILE")]
    pub selection: PathBuf,

    /// FASTA file whose sequences are filtered
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// Output FASTA (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory of record documents (overrides storage.record_dir)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,
}

pub fn run(args: SelectArgs, config: &Config) -> Result<()> {
    let criteria = SelectionCriteria::from_file(&args.selection)
        .with_context(|| format!("Failed to load selection {}", args.selection.display()))?;
    let store = super::record_store(config, args.record_dir.as_ref());
    let records = store
        .load_all()
        .with_context(|| format!("Failed to load records from {}", store.dir().display()))?;

    let selected = criteria.select(&records);
    tracing::info!("{} of {} records selected", selected.len(), records.len());

    let sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let total = sequences.len();
    let kept = filter_sequences(sequences, &selected);

    super::write_sequences(args.output.as_deref(), &kept)?;

    if let Some(path) = &args.output {
        output::success(&format!(
            "Selected {} of {} sequences into {}",
            kept.len(),
            total,
            path.display()
        ));
    }
    Ok(())
}
