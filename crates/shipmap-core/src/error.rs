//! Error types for config loading and topology construction.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that prevent the topology from being built.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no config found at {primary} or {fallback}")]
    NotFound { primary: PathBuf, fallback: PathBuf },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{address} is not a valid remote host for ship '{ship}': {reason}")]
    InvalidClientAddress {
        ship: String,
        address: String,
        reason: &'static str,
    },
}
