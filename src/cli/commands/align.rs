use crate::cli::output;
use crate::core::Config;
use crate::tools::{ExternalTool, Muscle};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AlignArgs {
    /// Unaligned FASTA input
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// Aligned FASTA output
    #[arg(value_name = "ALIGNMENT")]
    pub output: PathBuf,
}

pub fn run(args: AlignArgs, config: &Config) -> Result<()> {
    let muscle = Muscle::new(&config.tools.muscle);
    muscle.verify_installation()?;

    let pb = output::spinner(&format!("Aligning {} with {}", args.input.display(), muscle.name()));
    let result = muscle
        .align_file(&args.input, &args.output)
        .with_context(|| format!("Failed to align {}", args.input.display()));
    pb.finish_and_clear();
    result?;

    output::success(&format!("Alignment written to {}", args.output.display()));
    Ok(())
}
