pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "terpenome",
    version,
    about = "Terpene synthase and prenyltransferase classification pipeline",
    long_about = "Terpenome classifies protein records into terpene synthase and prenyltransferase \
                  families from their descriptions, annotates them with NCBI taxonomy, stores one \
                  JSON document per accession and drives MUSCLE, FastTree and HMMER around them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// Configuration file (defaults to $TERPENOME_HOME/config.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a FASTA file into classified, annotated record documents
    Extract(commands::extract::ExtractArgs),

    /// Write the sequences whose records match a selection file
    Select(commands::select::SelectArgs),

    /// Export stored records as a delimited table
    Table(commands::table::TableArgs),

    /// Count the values of one record field
    Summary(commands::summary::SummaryArgs),

    /// Write iTOL label and colour annotation files
    Itol(commands::itol::ItolArgs),

    /// Patch stored records from a metadata TSV
    AddMetadata(commands::add_metadata::AddMetadataArgs),

    /// Keep or exclude sequences listed in an accession file
    SelectIds(commands::select_ids::SelectIdsArgs),

    /// Remove identical sequences and close tree neighbours
    Dedup(commands::dedup::DedupArgs),

    /// Alignment utilities
    Alignment(commands::alignment::AlignmentArgs),

    /// Align sequences with MUSCLE
    Align(commands::align::AlignArgs),

    /// Build a tree with FastTree
    Tree(commands::tree::TreeArgs),

    /// Build, check and scan with profile HMMs
    Hmm(commands::hmm::HmmArgs),

    /// Show or create the configuration file
    Config(commands::config::ConfigArgs),
}
