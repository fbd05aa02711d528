pub mod bio;
pub mod classify;
pub mod cli;
pub mod core;
pub mod report;
pub mod storage;
pub mod tools;

pub use crate::bio::record::{ProteinRecord, SourceDatabase};
pub use crate::bio::taxonomy::{Annotator, Division};
pub use crate::classify::{Classifier, EnzymeTables, ReviewPolicy};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerpenomeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed {provenance} header '{header}': {reason}")]
    MalformedHeader {
        provenance: SourceDatabase,
        header: String,
        reason: String,
    },

    #[error("Taxonomy id {0} not found")]
    TaxonNotFound(u32),

    #[error("Unknown record field '{0}'")]
    UnknownField(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{command} returned {}: '{message}'", display_exit_code(.code))]
    ToolFailed {
        command: String,
        code: Option<i32>,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for TerpenomeError {
    fn from(err: serde_json::Error) -> Self {
        TerpenomeError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TerpenomeError {
    fn from(err: csv::Error) -> Self {
        TerpenomeError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TerpenomeError>;

fn display_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "no exit code".to_string(),
    }
}
