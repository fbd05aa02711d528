/// HMMER wrappers: profile construction and tabular scanning
use crate::tools::traits::ExternalTool;
use crate::{Result, TerpenomeError};
use serde::Serialize;
use std::path::Path;

/// One row of hmmscan `--tblout` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HmmHit {
    /// Profile name (target)
    pub hmm: String,
    /// Sequence name (query)
    pub query: String,
    pub evalue: f64,
    pub bitscore: f64,
    pub bias: f64,
}

/// Parse hmmscan/hmmsearch tabular output. Comment lines start with '#'.
pub fn parse_tblout(text: &str) -> Result<Vec<HmmHit>> {
    let parse_number = |token: &str, line_no: usize| -> Result<f64> {
        token.parse::<f64>().map_err(|_| {
            TerpenomeError::Parse(format!(
                "tblout line {}: invalid number '{}'",
                line_no, token
            ))
        })
    };

    let mut hits = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 7 {
            return Err(TerpenomeError::Parse(format!(
                "tblout line {}: expected at least 7 columns, found {}",
                line_no,
                columns.len()
            )));
        }
        hits.push(HmmHit {
            hmm: columns[0].to_string(),
            query: columns[2].to_string(),
            evalue: parse_number(columns[4], line_no)?,
            bitscore: parse_number(columns[5], line_no)?,
            bias: parse_number(columns[6], line_no)?,
        });
    }
    Ok(hits)
}

pub struct HmmBuild {
    binary: String,
}

impl HmmBuild {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Build profile `name` from an aligned FASTA given on stdin
    pub fn build(&self, name: &str, alignment: &str, hmm_out: &Path) -> Result<()> {
        let args = vec![
            "-n".to_string(),
            name.to_string(),
            "--informat".to_string(),
            "afa".to_string(),
            hmm_out.display().to_string(),
            "-".to_string(),
        ];
        self.run(&args, Some(alignment))?;
        Ok(())
    }
}

impl ExternalTool for HmmBuild {
    fn name(&self) -> &str {
        "hmmbuild"
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}

pub struct HmmScan {
    binary: String,
}

impl HmmScan {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Scan `fasta` against a pressed HMM database, reading hits from `--tblout`
    pub fn scan(&self, hmm_db: &Path, fasta: &Path, extra_args: &[String]) -> Result<Vec<HmmHit>> {
        let tblout = tempfile::Builder::new()
            .prefix("terpenome-hmmscan")
            .suffix(".tbl")
            .tempfile()?;

        let mut args = vec![
            "--tblout".to_string(),
            tblout.path().display().to_string(),
            "-o".to_string(),
            null_device().to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        args.push(hmm_db.display().to_string());
        args.push(fasta.display().to_string());

        self.run(&args, None)?;

        let text = std::fs::read_to_string(tblout.path())?;
        let hits = parse_tblout(&text)?;
        tracing::info!("hmmscan reported {} hits", hits.len());
        Ok(hits)
    }
}

impl ExternalTool for HmmScan {
    fn name(&self) -> &str {
        "hmmscan"
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}

fn null_device() -> &'static str {
    if cfg!(windows) {
        "NUL"
    } else {
        "/dev/null"
    }
}
