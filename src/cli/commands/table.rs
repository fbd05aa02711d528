use crate::cli::output;
use crate::core::Config;
use crate::report::table::write_table;
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct TableArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Column delimiter, a single character; "\t" for tab
    #[arg(short, long, default_value = ",")]
    pub delimiter: String,

    /// Directory of record documents (overrides storage.record_dir)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,
}

fn parse_delimiter(delimiter: &str) -> Result<u8> {
    match delimiter {
        "\\t" | "tab" => Ok(b'\t'),
        d if d.len() == 1 => Ok(d.as_bytes()[0]),
        d => bail!("Delimiter must be a single ASCII character, got '{}'", d),
    }
}

pub fn run(args: TableArgs, config: &Config) -> Result<()> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    let store = super::record_store(config, args.record_dir.as_ref());
    let records = store
        .load_all()
        .with_context(|| format!("Failed to load records from {}", store.dir().display()))?;

    let writer = super::open_output(args.output.as_deref())?;
    let rows = write_table(writer, &records, delimiter)?;

    if let Some(path) = &args.output {
        output::success(&format!("Wrote {} rows to {}", rows, path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
