/// Read-only views over stored records: selection, summaries, tables, tree annotations
pub mod itol;
pub mod selection;
pub mod summary;
pub mod table;

use crate::{Result, TerpenomeError};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a mapping file as JSON (`.json`) or TOML (anything else)
pub fn read_mapping_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&content)
            .map_err(|e| TerpenomeError::Parse(format!("{}: {}", path.display(), e)))
    } else {
        toml::from_str(&content)
            .map_err(|e| TerpenomeError::Parse(format!("{}: {}", path.display(), e)))
    }
}
