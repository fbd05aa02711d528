use crate::bio::fasta::parse_fasta;
use crate::bio::record::{ProteinRecord, SourceDatabase, UNKNOWN_LABEL};
use crate::bio::taxonomy::{ncbi, Annotator};
use crate::classify::apply_curation;
use crate::cli::output::{self, format_number, progress_bar, spinner, tree_item};
use crate::core::Config;
use crate::storage::RecordStore;
use crate::TerpenomeError;
use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExtractArgs {
    /// FASTA file with one protein per record (may be gzipped)
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// Header convention of the input (interpro, uniprot, ncbi)
    #[arg(short, long, value_name = "DATABASE")]
    pub source: SourceDatabase,

    /// Directory for the record documents (overrides storage.record_dir)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,

    /// Skip taxonomic annotation
    #[arg(long)]
    pub no_taxonomy: bool,

    /// Abort on malformed headers and unknown taxonomy ids instead of skipping them
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ExtractArgs, config: &Config) -> Result<()> {
    let classifier = config.classifier().context("Failed to build classifier")?;
    let record_dir = args.record_dir.as_ref().unwrap_or(&config.storage.record_dir);
    let store = RecordStore::create(record_dir)
        .with_context(|| format!("Failed to create {}", record_dir.display()))?;

    output::action(&format!("Reading {}", args.input.display()));
    let sequences = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut records = Vec::with_capacity(sequences.len());
    let mut malformed = 0usize;
    for sequence in &sequences {
        match ProteinRecord::from_header(args.source, &sequence.header_line()) {
            Ok(record) => records.push(record),
            Err(e) if !args.strict => {
                tracing::warn!("{}", e);
                malformed += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    records.par_iter_mut().for_each(|record| {
        record.classify(&classifier);
        if apply_curation(&config.curation, classifier.policy(), record) {
            tracing::debug!("Curated {}", record.accession());
        }
    });

    let mut unannotated = 0usize;
    let needs_taxonomy = records.iter().any(|r| r.taxonomy_id().is_some());
    if !args.no_taxonomy && needs_taxonomy {
        let taxdump = config.taxdump_dir();
        let pb = spinner(&format!("Loading taxonomy from {}", taxdump.display()));
        let db = ncbi::load_taxdump(&taxdump)
            .with_context(|| format!("Failed to load taxonomy from {}", taxdump.display()))?;
        pb.finish_and_clear();
        tracing::info!("Loaded {} taxa", db.taxa_count());

        let annotator = Annotator::with_rules(&db, config.taxonomy.division_rules.clone());
        let failures: Vec<TerpenomeError> = records
            .par_iter_mut()
            .filter_map(|record| record.annotate(&annotator).err())
            .collect();

        if args.strict {
            if let Some(first) = failures.into_iter().next() {
                return Err(first.into());
            }
        } else {
            for failure in &failures {
                tracing::warn!("{}, record kept without organism", failure);
            }
            unannotated = failures.len();
        }
    }

    let pb = progress_bar(records.len() as u64, "Writing records");
    for record in &records {
        store
            .write(record)
            .with_context(|| format!("Failed to write record {}", record.accession()))?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    output::success(&format!(
        "Wrote {} records to {}",
        format_number(records.len()),
        store.dir().display()
    ));
    tree_item(false, "Sequences read", Some(&format_number(sequences.len())));
    tree_item(false, "Malformed headers skipped", Some(&format_number(malformed)));
    tree_item(
        false,
        "Classified",
        Some(&format_number(
            records
                .iter()
                .filter(|r| !r.enzyme_types().contains(UNKNOWN_LABEL))
                .count(),
        )),
    );
    tree_item(true, "Without taxonomy", Some(&format_number(unannotated)));
    Ok(())
}
