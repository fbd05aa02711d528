use crate::bio::fasta::parse_fasta;
use crate::cli::output;
use crate::report::selection::select_by_ids;
use crate::tools::hmm::read_accession_list;
use anyhow::{Context, Result};
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Args)]
pub struct SelectIdsArgs {
    /// Input FASTA file
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// File with one accession per line
    #[arg(value_name = "ACCESSIONS")]
    pub accessions: PathBuf,

    /// Output FASTA (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Drop the listed accessions instead of keeping them
    #[arg(long)]
    pub exclude: bool,

    /// Write only the sequence id in each header
    #[arg(long)]
    pub id_only: bool,
}

pub fn run(args: SelectIdsArgs) -> Result<()> {
    let ids: HashSet<String> = read_accession_list(&args.accessions)
        .with_context(|| format!("Failed to read {}", args.accessions.display()))?
        .into_iter()
        .collect();
    let sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let total = sequences.len();

    let mut selection = select_by_ids(sequences, &ids, args.exclude);
    if args.id_only {
        for seq in &mut selection.sequences {
            seq.description = None;
        }
    }
    super::write_sequences(args.output.as_deref(), &selection.sequences)?;

    if let Some(path) = &args.output {
        output::success(&format!(
            "Kept {} of {} sequences in {}",
            selection.sequences.len(),
            total,
            path.display()
        ));
        if selection.duplicates > 0 {
            output::info(&format!("Skipped {} duplicate sequences", selection.duplicates));
        }
    }
    Ok(())
}
