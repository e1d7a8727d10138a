//! Configuration errors.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file contents could not be parsed.
    #[error("Failed to parse config {path}: {message}")]
    Parse { path: String, message: String },

    /// Serialization of the config failed.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// A value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
