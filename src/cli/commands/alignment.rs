use crate::bio::alignment::{cut_regions, parse_regions, reorder, simplify_headers};
use crate::bio::fasta::parse_fasta;
use crate::cli::output;
use crate::tools::hmm::read_accession_list;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Args)]
pub struct AlignmentArgs {
    #[command(subcommand)]
    pub command: AlignmentCommands,
}

#[derive(Subcommand)]
pub enum AlignmentCommands {
    /// Reduce every header to its accession
    Simplify(SimplifyArgs),

    /// Keep only the given column regions, concatenated
    Cut(CutArgs),

    /// Move listed accessions to the top of the alignment
    Reorder(ReorderArgs),
}

#[derive(Args)]
pub struct SimplifyArgs {
    /// Aligned FASTA input
    #[arg(value_name = "ALIGNMENT")]
    pub input: PathBuf,

    /// Output alignment (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CutArgs {
    /// Aligned FASTA input
    #[arg(value_name = "ALIGNMENT")]
    pub input: PathBuf,

    /// 1-based inclusive column regions, e.g. 1:8,10:12,21
    #[arg(value_name = "REGIONS")]
    pub regions: String,

    /// Output alignment (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Aligned FASTA input
    #[arg(value_name = "ALIGNMENT")]
    pub input: PathBuf,

    /// File with one accession per line to place first
    #[arg(value_name = "ACCESSIONS")]
    pub accessions: PathBuf,

    /// Output alignment (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: AlignmentArgs) -> Result<()> {
    match args.command {
        AlignmentCommands::Simplify(args) => simplify(args),
        AlignmentCommands::Cut(args) => cut(args),
        AlignmentCommands::Reorder(args) => reorder_rows(args),
    }
}

fn simplify(args: SimplifyArgs) -> Result<()> {
    let mut sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    simplify_headers(&mut sequences);
    super::write_sequences(args.output.as_deref(), &sequences)?;
    if let Some(path) = &args.output {
        output::success(&format!("Simplified {} headers into {}", sequences.len(), path.display()));
    }
    Ok(())
}

fn cut(args: CutArgs) -> Result<()> {
    let regions = parse_regions(&args.regions)?;
    let sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let cut = cut_regions(&sequences, &regions)?;
    super::write_sequences(args.output.as_deref(), &cut)?;
    if let Some(path) = &args.output {
        let width = cut.first().map(|s| s.len()).unwrap_or(0);
        output::success(&format!(
            "Cut {} columns from {} sequences into {}",
            width,
            cut.len(),
            path.display()
        ));
    }
    Ok(())
}

fn reorder_rows(args: ReorderArgs) -> Result<()> {
    let first: HashSet<String> = read_accession_list(&args.accessions)
        .with_context(|| format!("Failed to read {}", args.accessions.display()))?
        .into_iter()
        .collect();
    let sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let reordered = reorder(sequences, &first);
    super::write_sequences(args.output.as_deref(), &reordered)?;
    if let Some(path) = &args.output {
        output::success(&format!("Reordered {} rows into {}", reordered.len(), path.display()));
    }
    Ok(())
}
