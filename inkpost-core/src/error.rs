/// Structured error types for inkpost-core.
///
/// Every store operation reports one of four kinds: bad caller input,
/// a missing record, a document that cannot be parsed, or a filesystem
/// failure. The HTTP layer maps each kind to a status code.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::frontmatter::FrontmatterError;
use crate::validation::ValidationError;

/// Main error type for inkpost-core operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Required field missing or malformed input
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Id does not resolve to an existing record
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Stored document could not be parsed
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// Filesystem read/write failed
    #[error("storage error at {path:?}: {source}")]
    Storage { path: PathBuf, source: io::Error },
}

/// Result type alias for inkpost-core operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a not-found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a malformed document error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Create a storage error for the given path
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

impl From<FrontmatterError> for StoreError {
    fn from(e: FrontmatterError) -> Self {
        Self::malformed(e.to_string())
    }
}
