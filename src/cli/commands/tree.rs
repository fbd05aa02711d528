use crate::cli::output;
use crate::core::Config;
use crate::tools::{ExternalTool, FastTree};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct TreeArgs {
    /// Aligned FASTA input
    #[arg(value_name = "ALIGNMENT")]
    pub input: PathBuf,

    /// Newick tree output
    #[arg(value_name = "TREE")]
    pub output: PathBuf,
}

pub fn run(args: TreeArgs, config: &Config) -> Result<()> {
    let fasttree = FastTree::new(&config.tools.fasttree);
    fasttree.verify_installation()?;

    let pb = output::spinner(&format!("Building tree from {}", args.input.display()));
    let result = fasttree
        .build_tree(&args.input, &args.output)
        .with_context(|| format!("Failed to build a tree from {}", args.input.display()));
    pb.finish_and_clear();
    result?;

    output::success(&format!("Tree written to {}", args.output.display()));
    Ok(())
}
