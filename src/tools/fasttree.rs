/// FastTree approximate maximum-likelihood trees
use crate::tools::traits::ExternalTool;
use crate::Result;
use std::path::Path;

pub struct FastTree {
    binary: String,
}

impl FastTree {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Build a Newick tree from an aligned FASTA file
    pub fn build_tree(&self, alignment: &Path, tree_out: &Path) -> Result<()> {
        let args = vec![
            "-out".to_string(),
            tree_out.display().to_string(),
            alignment.display().to_string(),
        ];
        self.run(&args, None)?;
        tracing::info!("Wrote tree {}", tree_out.display());
        Ok(())
    }
}

impl ExternalTool for FastTree {
    fn name(&self) -> &str {
        "FastTree"
    }

    fn binary(&self) -> &str {
        &self.binary
    }

    fn version_flag(&self) -> &str {
        "-expert"
    }
}
