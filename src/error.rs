use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {file} - {details}")]
    MalformedDocument { file: PathBuf, details: String },

    #[error("No <recordType> element found in {file}")]
    MissingEntityElement { file: PathBuf },

    #[error("Failed to write output: {file} - {details}")]
    OutputWrite { file: PathBuf, details: String },

    #[error("File system traversal error: {path} - {reason}")]
    FileSystemTraversal { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },
}

impl From<crate::config::ConfigError> for ConversionError {
    fn from(err: crate::config::ConfigError) -> Self {
        ConversionError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ConversionError>;
