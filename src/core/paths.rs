use std::path::PathBuf;
use std::sync::OnceLock;

static TERPENOME_HOME: OnceLock<PathBuf> = OnceLock::new();
static TERPENOME_TAXDUMP_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the terpenome home directory
/// Checks TERPENOME_HOME environment variable, falls back to ${HOME}/.terpenome
pub fn terpenome_home() -> PathBuf {
    TERPENOME_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TERPENOME_HOME") {
                PathBuf::from(path)
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".terpenome")
            }
        })
        .clone()
}

/// Get the NCBI taxonomy dump directory (names.dmp, nodes.dmp)
/// Checks TERPENOME_TAXDUMP_DIR environment variable, falls back to TERPENOME_HOME/taxdump
pub fn taxdump_dir() -> PathBuf {
    TERPENOME_TAXDUMP_DIR
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TERPENOME_TAXDUMP_DIR") {
                PathBuf::from(path)
            } else {
                terpenome_home().join("taxdump")
            }
        })
        .clone()
}

/// Default configuration file: TERPENOME_HOME/config.toml
pub fn config_path() -> PathBuf {
    terpenome_home().join("config.toml")
}
