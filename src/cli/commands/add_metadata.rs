use crate::cli::output::{self, tree_item};
use crate::core::Config;
use crate::storage::{apply_metadata, read_metadata, RecordStore};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AddMetadataArgs {
    /// Tab-separated file whose first column is `accession`
    #[arg(value_name = "TSV")]
    pub metadata: PathBuf,

    /// Directory of record documents (overrides storage.record_dir)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,
}

pub fn run(args: AddMetadataArgs, config: &Config) -> Result<()> {
    let patches = read_metadata(&args.metadata)
        .with_context(|| format!("Failed to read metadata {}", args.metadata.display()))?;
    let record_dir = args.record_dir.as_ref().unwrap_or(&config.storage.record_dir);
    let store = RecordStore::create(record_dir)
        .with_context(|| format!("Failed to create {}", record_dir.display()))?;

    let summary = apply_metadata(&store, &patches, &config.taxonomy.division_rules)?;
    output::success(&format!("Applied {} metadata rows", patches.len()));
    tree_item(false, "Updated", Some(&summary.updated.to_string()));
    tree_item(true, "Created", Some(&summary.created.to_string()));
    Ok(())
}
