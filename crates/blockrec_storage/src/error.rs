//! Error types for byte source operations.

use std::io;
use thiserror::Error;

/// Result type for byte source operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading from a byte source.
///
/// End of stream is not represented here: a read at or past the end
/// returns fewer bytes than requested.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred in the underlying resource.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Returns the underlying I/O error kind.
    #[must_use]
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::Io(e) => e.kind(),
        }
    }
}
