//! Error types for transformer configuration and input loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring a [`TypeTransformer`](crate::TypeTransformer).
///
/// These are the only failures the library surfaces as errors; data-shape
/// problems during a transform pass never fail, they leave values unchanged.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NoTransform option cannot be combined with other flags")]
    ConflictingFlags,

    #[error("custom normalization must be enabled before registering a custom normalizer")]
    CustomNormalizationDisabled,
}

impl ConfigError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2 // usage error
    }
}

/// Errors during record or schema loading.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid JSON on line {line}: {source}")]
    InvalidJsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. }
            | LoadError::ReadError { .. }
            | LoadError::WriteError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
