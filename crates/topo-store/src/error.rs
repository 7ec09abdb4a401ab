//! Error types for the team store

use std::path::PathBuf;
use topo_parse::{ParseError, SerializeError};

/// Errors from store operations
///
/// Batch loading never returns these for individual files; they are logged
/// and the file is skipped.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A single-file parse failed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Writing a team file failed
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// No team matched a lookup
    #[error("team not found: {identifier}")]
    NotFound { identifier: String },

    /// A view config file is not valid JSON for its schema
    #[error("invalid config file {path}: {source}")]
    ConfigJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error outside single-file parsing
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create not-found error for identifier
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
