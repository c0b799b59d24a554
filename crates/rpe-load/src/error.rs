//! Error types for the RPE loader
//!
//! Nothing in the loader retries or recovers: every variant here ends the run
//! and is reported to the user as-is.

use std::path::Path;
use thiserror::Error;

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Error type for layout parsing, schema building and loading
#[derive(Error, Debug)]
pub enum LoadError {
    /// Layout or data file is missing
    #[error("File not found: '{0}'. Verify the path exists and you have read permissions.")]
    FileNotFound(String),

    /// Layout file is readable but does not describe a usable set of fields
    #[error("Invalid layout '{path}': {message}")]
    InvalidLayout { path: String, message: String },

    /// Table name is empty
    #[error("Invalid table name '{0}': table names must not be empty")]
    InvalidTableName(String),

    /// Data file header repeats a column name
    #[error("Duplicate column '{column}' in header of '{path}'")]
    DuplicateHeader { path: String, column: String },

    /// Delimited file could not be parsed (bad row length, invalid UTF-8, ...)
    #[error("Failed to parse '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// SQLite rejected a statement
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Dataset manifest could not be parsed
    #[error("Failed to parse dataset manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid layout error
    pub fn invalid_layout(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::InvalidLayout {
            path: path.as_ref().display().to_string(),
            message: msg.into(),
        }
    }

    /// Wrap a CSV error together with the file it came from
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Map an I/O error on `path`, turning `NotFound` into [`LoadError::FileNotFound`]
    pub fn open(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path.as_ref().display().to_string())
        } else {
            Self::Io(err)
        }
    }
}
