//! Error types for scenecrate

use thiserror::Error;

/// Main error type for scenecrate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported item kind: {0}")]
    UnsupportedItemKind(String),

    #[error("Item {0} is already registered")]
    DuplicateItem(u64),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),
}

/// Result type alias for scenecrate operations
pub type Result<T> = std::result::Result<T, Error>;
