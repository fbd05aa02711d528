use crate::bio::alignment::deduplicate;
use crate::bio::fasta::parse_fasta;
use crate::bio::newick::NewickTree;
use crate::cli::output;
use anyhow::{Context, Result};
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Args)]
pub struct DedupArgs {
    /// Input FASTA or aligned FASTA
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// Output FASTA (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Newick tree of the sequences; adjacent leaves within --cutoff are collapsed
    #[arg(long, value_name = "FILE", requires = "cutoff")]
    pub tree: Option<PathBuf>,

    /// Patristic distance at or below which adjacent leaves count as duplicates
    #[arg(long)]
    pub cutoff: Option<f64>,
}

pub fn run(args: DedupArgs) -> Result<()> {
    let sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut close_neighbours = HashSet::new();
    if let (Some(tree_path), Some(cutoff)) = (&args.tree, args.cutoff) {
        let tree = NewickTree::from_file(tree_path)
            .with_context(|| format!("Failed to read tree {}", tree_path.display()))?;
        close_neighbours.extend(tree.adjacent_duplicates(cutoff));
        tracing::info!(
            "{} leaves within {} of their right neighbour",
            close_neighbours.len(),
            cutoff
        );
    }

    let (kept, removed) = deduplicate(sequences, &close_neighbours);
    super::write_sequences(args.output.as_deref(), &kept)?;

    if args.output.is_some() {
        output::success(&format!("Removed {} sequences, kept {}", removed, kept.len()));
    }
    Ok(())
}
