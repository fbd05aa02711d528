use crate::bio::field::RecordField;
use crate::cli::output;
use crate::core::Config;
use crate::report::itol::{load_colour_map, write_colours, write_labels};
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ItolArgs {
    /// Labels file to write (accession to protein name)
    #[arg(long, value_name = "FILE")]
    pub labels: Option<PathBuf>,

    /// Colours file to write (needs --colour-map)
    #[arg(long, value_name = "FILE", requires = "colour_map")]
    pub colours: Option<PathBuf>,

    /// Record field whose value picks the colour
    #[arg(long, default_value = "organism_division")]
    pub group_by: RecordField,

    /// TOML or JSON map from field value to colour
    #[arg(long, value_name = "FILE")]
    pub colour_map: Option<PathBuf>,

    /// Directory of record documents (overrides storage.record_dir)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,
}

pub fn run(args: ItolArgs, config: &Config) -> Result<()> {
    if args.labels.is_none() && args.colours.is_none() {
        bail!("Nothing to write: give --labels and/or --colours");
    }

    let store = super::record_store(config, args.record_dir.as_ref());
    let records = store
        .load_all()
        .with_context(|| format!("Failed to load records from {}", store.dir().display()))?;

    if let Some(path) = &args.labels {
        write_labels(super::open_output(Some(path))?, &records)?;
        output::success(&format!("Wrote {} labels to {}", records.len(), path.display()));
    }

    if let (Some(path), Some(map_path)) = (&args.colours, &args.colour_map) {
        let colours = load_colour_map(map_path)
            .with_context(|| format!("Failed to load colour map {}", map_path.display()))?;
        let skipped = write_colours(
            super::open_output(Some(path))?,
            &records,
            args.group_by,
            &colours,
        )?;
        output::success(&format!(
            "Wrote {} colours to {}",
            records.len() - skipped,
            path.display()
        ));
        if skipped > 0 {
            output::warning(&format!(
                "{} records had no colour for their {}",
                skipped, args.group_by
            ));
        }
    }
    Ok(())
}
