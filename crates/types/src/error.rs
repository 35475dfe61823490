//! Error types for envflat

use thiserror::Error;

/// Main error type for reading, flattening and exporting configuration
#[derive(Error, Debug)]
pub enum EnvflatError {
    /// The supplied input path is not an existing regular file
    #[error("readable_file:{path} is not a valid path")]
    InvalidPath { path: String },

    /// The input could not be read or decoded for its detected format
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// No parser is registered for the file extension
    #[error("Given file cannot be parsed: unsupported extension '{extension}'")]
    UnsupportedFormat { extension: String },

    /// Export requested with an unknown target format
    #[error("Output format '{format}' is incorrect (expected 'env' or 'json')")]
    InvalidFormat { format: String },

    /// Export or apply called before a successful read
    #[error("No configuration loaded: read a configuration file first")]
    NotLoaded,

    /// Two tree paths flattened to the same key under the reject policy
    #[error("Flattened key collision on '{key}'")]
    KeyCollision { key: String },

    /// A flattened entry cannot be stored in the process environment
    #[error("Cannot set environment variable {key:?}: {reason}")]
    InvalidVariable { key: String, reason: String },

    /// Filesystem errors while writing exports
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Tool settings errors
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type alias for envflat operations
pub type Result<T> = std::result::Result<T, EnvflatError>;

/// Tool settings specific errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings could not be extracted from their providers
    #[error("Failed to extract settings: {0}")]
    Extract(String),

    /// Validation error
    #[error("Settings validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl From<SettingsError> for EnvflatError {
    fn from(err: SettingsError) -> Self {
        EnvflatError::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for EnvflatError {
    fn from(err: serde_json::Error) -> Self {
        EnvflatError::Serialization(err.to_string())
    }
}
