//! Persistence error handling
//!
//! Typed errors for bookmark file operations. Load and save never propagate
//! these to the caller as failures; they are carried inside
//! [`LoadOutcome`](crate::persistence::LoadOutcome) and
//! [`SaveOutcome`](crate::persistence::SaveOutcome) so callers can tell a
//! missing file from a corrupt one.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the bookmark file
#[derive(Error, Debug)]
pub enum PersistError {
    /// File does not exist
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File exists but is not a valid tree document
    #[error("Invalid bookmark document in '{path}': {details}")]
    Parse { path: PathBuf, details: String },

    /// Tree document could not be rendered
    #[error("Failed to serialize bookmark document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Destination directory is missing or read-only
    #[error("Directory '{path}' is not writable")]
    DirectoryNotWritable { path: PathBuf },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWrite {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    /// Create a read-side error from an I/O error with path context
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => PersistError::NotFound { path },
            io::ErrorKind::PermissionDenied => PersistError::PermissionDenied {
                path,
                source: error,
            },
            _ => PersistError::Read {
                path,
                source: error,
            },
        }
    }

    /// Create a write-side error from an I/O error with path context
    pub fn from_write(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => PersistError::PermissionDenied {
                path,
                source: error,
            },
            _ => PersistError::Write {
                path,
                source: error,
            },
        }
    }

    /// Whether the error means there was simply nothing to load
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::NotFound { .. })
    }
}

/// Result type for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;
