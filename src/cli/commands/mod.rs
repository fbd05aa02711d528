pub mod add_metadata;
pub mod align;
pub mod alignment;
pub mod config;
pub mod dedup;
pub mod extract;
pub mod hmm;
pub mod itol;
pub mod select;
pub mod select_ids;
pub mod summary;
pub mod table;
pub mod tree;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use crate::bio::fasta::{write_fasta, write_fasta_to_writer};
use crate::bio::Sequence;
use crate::core::Config;
use crate::storage::RecordStore;

/// Record store from `--record-dir`, falling back to `storage.record_dir`
pub fn record_store(config: &Config, record_dir: Option<&PathBuf>) -> RecordStore {
    let dir = record_dir.unwrap_or(&config.storage.record_dir);
    RecordStore::new(dir)
}

/// Buffered writer for `path`, or stdout when no path is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Write FASTA to `path` (gzipped for `.gz`), or to stdout
pub fn write_sequences(path: Option<&Path>, sequences: &[Sequence]) -> Result<()> {
    match path {
        Some(path) => write_fasta(path, sequences)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut writer = open_output(None)?;
            write_fasta_to_writer(&mut writer, sequences)?;
            writer.flush()?;
            Ok(())
        }
    }
}
