//! Error types for herald-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file did not exist at the expected path.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file parsed but its contents are not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
