use crate::cli::output::{self, tree_item};
use crate::core::config::save_config;
use crate::core::{paths, Config};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with all defaults filled in
    Init {
        /// Destination (defaults to $TERPENOME_HOME/config.toml)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,

    /// Write the enzyme family tables in use, as a starting point for classifier.table_file
    Tables {
        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

pub fn run(args: ConfigArgs, config: &Config) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or_else(paths::config_path);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_config(&path, &Config::default())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::success(&format!("Wrote default configuration to {}", path.display()));
        }
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(config).context("Failed to render configuration")?;
            output::section_header("Configuration");
            tree_item(false, "Home", Some(&paths::terpenome_home().display().to_string()));
            tree_item(true, "Taxonomy dump", Some(&config.taxdump_dir().display().to_string()));
            println!("\n{}", text);
        }
        ConfigCommands::Tables { output: path } => {
            let text = config.enzyme_tables()?.to_toml()?;
            match &path {
                Some(path) => {
                    std::fs::write(path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    output::success(&format!("Wrote enzyme tables to {}", path.display()));
                }
                None => print!("{}", text),
            }
        }
    }
    Ok(())
}
