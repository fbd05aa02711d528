use anyhow::Context;
use clap::Parser;
use colored::*;
use std::process;
use terpenome::cli::commands;
use terpenome::cli::{Cli, Commands};
use terpenome::core::config::resolve_config;
use terpenome::TerpenomeError;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // TERPENOME_LOG sets the baseline, each -v raises it
    let log_level = match cli.verbose {
        0 => std::env::var("TERPENOME_LOG").unwrap_or_else(|_| "warn".to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<TerpenomeError>() {
            Some(TerpenomeError::Config(_)) => 2,
            Some(TerpenomeError::Io(_)) => 3,
            Some(TerpenomeError::Parse(_))
            | Some(TerpenomeError::MalformedHeader { .. })
            | Some(TerpenomeError::UnknownField(_)) => 4,
            Some(TerpenomeError::TaxonNotFound(_)) => 5,
            Some(TerpenomeError::ToolFailed { .. }) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to initialize thread pool")?;
    tracing::debug!("Using {} threads", num_threads);

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract(args) => commands::extract::run(args, &config),
        Commands::Select(args) => commands::select::run(args, &config),
        Commands::Table(args) => commands::table::run(args, &config),
        Commands::Summary(args) => commands::summary::run(args, &config),
        Commands::Itol(args) => commands::itol::run(args, &config),
        Commands::AddMetadata(args) => commands::add_metadata::run(args, &config),
        Commands::SelectIds(args) => commands::select_ids::run(args),
        Commands::Dedup(args) => commands::dedup::run(args),
        Commands::Alignment(args) => commands::alignment::run(args),
        Commands::Align(args) => commands::align::run(args, &config),
        Commands::Tree(args) => commands::tree::run(args, &config),
        Commands::Hmm(args) => commands::hmm::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
