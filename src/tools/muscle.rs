/// MUSCLE multiple sequence aligner
use crate::bio::fasta::{parse_fasta_from_bytes, to_fasta_string};
use crate::bio::sequence::Sequence;
use crate::tools::traits::ExternalTool;
use crate::{Result, TerpenomeError};
use std::path::Path;

pub struct Muscle {
    binary: String,
}

impl Muscle {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Align a FASTA file into an aligned FASTA file
    pub fn align_file(&self, input: &Path, output: &Path) -> Result<()> {
        let args = vec![
            "-in".to_string(),
            input.display().to_string(),
            "-out".to_string(),
            output.display().to_string(),
        ];
        self.run(&args, None)?;
        tracing::info!("Aligned {} -> {}", input.display(), output.display());
        Ok(())
    }

    /// Align sequences in memory, piping FASTA through stdin and stdout
    pub fn align(&self, sequences: &[Sequence]) -> Result<Vec<Sequence>> {
        if sequences.is_empty() {
            return Err(TerpenomeError::InvalidInput(
                "No sequences to align".to_string(),
            ));
        }
        let result = self.run(&["-quiet".to_string()], Some(&to_fasta_string(sequences)))?;
        parse_fasta_from_bytes(result.stdout.as_bytes())
    }
}

impl ExternalTool for Muscle {
    fn name(&self) -> &str {
        "MUSCLE"
    }

    fn binary(&self) -> &str {
        &self.binary
    }

    fn version_flag(&self) -> &str {
        "-version"
    }
}
