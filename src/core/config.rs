//! Configuration types for terpenome

use crate::bio::taxonomy::{default_division_rules, DivisionRule};
use crate::classify::{default_curation_rules, Classifier, CurationRule, EnzymeTables, ReviewPolicy};
use crate::core::paths;
use crate::{Result, TerpenomeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default = "default_curation_rules")]
    pub curation: Vec<CurationRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub review_policy: ReviewPolicy,
    /// TOML file replacing the built-in enzyme family tables
    #[serde(default)]
    pub table_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Directory holding names.dmp and nodes.dmp
    #[serde(default)]
    pub taxdump_dir: Option<PathBuf>,
    /// Checked in order; the first rule whose taxon is in the lineage wins
    #[serde(default = "default_division_rules")]
    pub division_rules: Vec<DivisionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_record_dir")]
    pub record_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_muscle")]
    pub muscle: String,
    #[serde(default = "default_fasttree")]
    pub fasttree: String,
    #[serde(default = "default_hmmbuild")]
    pub hmmbuild: String,
    #[serde(default = "default_hmmscan")]
    pub hmmscan: String,
}

fn default_record_dir() -> PathBuf {
    PathBuf::from("records")
}

fn default_muscle() -> String {
    "muscle".to_string()
}

fn default_fasttree() -> String {
    "FastTree".to_string()
}

fn default_hmmbuild() -> String {
    "hmmbuild".to_string()
}

fn default_hmmscan() -> String {
    "hmmscan".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            taxonomy: TaxonomyConfig::default(),
            storage: StorageConfig::default(),
            tools: ToolsConfig::default(),
            curation: default_curation_rules(),
        }
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            taxdump_dir: None,
            division_rules: default_division_rules(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            record_dir: default_record_dir(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            muscle: default_muscle(),
            fasttree: default_fasttree(),
            hmmbuild: default_hmmbuild(),
            hmmscan: default_hmmscan(),
        }
    }
}

impl Config {
    /// Built-in tables unless `classifier.table_file` is set
    pub fn enzyme_tables(&self) -> Result<EnzymeTables> {
        match &self.classifier.table_file {
            Some(path) => EnzymeTables::from_file(path),
            None => Ok(EnzymeTables::default()),
        }
    }

    pub fn classifier(&self) -> Result<Classifier> {
        Classifier::new(&self.enzyme_tables()?, self.classifier.review_policy)
    }

    pub fn taxdump_dir(&self) -> PathBuf {
        self.taxonomy
            .taxdump_dir
            .clone()
            .unwrap_or_else(paths::taxdump_dir)
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| TerpenomeError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| TerpenomeError::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Load `path` if given, else the default config file if present, else defaults
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = paths::config_path();
            if default_path.exists() {
                tracing::debug!("Using config {}", default_path.display());
                load_config(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::taxonomy::Division;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.classifier.review_policy, ReviewPolicy::MatchAll);
        assert!(config.classifier.table_file.is_none());

        assert_eq!(config.taxonomy.division_rules.len(), 4);
        assert_eq!(config.taxonomy.division_rules[0].taxon_id, 5204);

        assert_eq!(config.storage.record_dir, PathBuf::from("records"));
        assert_eq!(config.tools.fasttree, "FastTree");
        assert_eq!(config.curation.len(), 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[classifier]
review_policy = "reviewed-only"

[[taxonomy.division_rules]]
taxon_id = 4751
division = "Other"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.classifier.review_policy, ReviewPolicy::ReviewedOnly);
        assert_eq!(config.taxonomy.division_rules.len(), 1);
        assert_eq!(config.taxonomy.division_rules[0].division, Division::Other);
        assert_eq!(config.tools.muscle, "muscle");
        assert_eq!(config.curation.len(), 5);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = Config::default();
        config.storage.record_dir = PathBuf::from("/data/records");
        config.curation.clear();

        let file = NamedTempFile::new().unwrap();
        save_config(file.path(), &config).unwrap();
        let loaded = load_config(file.path()).unwrap();

        assert_eq!(loaded.storage.record_dir, PathBuf::from("/data/records"));
        assert!(loaded.curation.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[classifier]\nreview_policy = \"sometimes\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(TerpenomeError::Config(_))));
    }
}
