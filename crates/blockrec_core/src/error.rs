//! Error types for blockrec core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while decoding, reading, or scanning records.
///
/// Reaching the end of the data is not an error: decode and read
/// operations return `Ok(None)` in that case.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Byte source error.
    #[error("storage error: {0}")]
    Storage(#[from] blockrec_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reader or codec was configured with unusable parameters.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the configuration issue.
        message: String,
    },

    /// A complete header was read but the stream ends inside the payload.
    #[error(
        "truncated record at block offset {offset}: header declares {length} payload bytes, \
         only {available} available"
    )]
    TruncatedRecord {
        /// Block offset of the record.
        offset: u64,
        /// Payload length declared by the header.
        length: u32,
        /// Payload bytes actually present.
        available: u64,
    },

    /// The payload does not match the checksum stored in its header.
    #[error("checksum mismatch at block offset {offset}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Block offset of the record.
        offset: u64,
        /// Checksum stored in the header.
        expected: u32,
        /// Checksum computed over the payload.
        actual: u32,
    },

    /// The header declares a payload longer than the configured maximum.
    #[error("record at block offset {offset} declares {length} bytes, maximum is {max}")]
    RecordTooLarge {
        /// Block offset of the record.
        offset: u64,
        /// Payload length declared by the header.
        length: u32,
        /// Configured maximum payload length.
        max: u32,
    },

    /// The reader has been closed.
    #[error("reader is closed")]
    Closed,
}

impl CoreError {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Returns `true` if the error describes a damaged record that a scan
    /// may step over.
    ///
    /// Truncation and I/O failures are not corruption in this sense: they
    /// mean the stream itself is incomplete or unreadable.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. } | Self::RecordTooLarge { .. }
        )
    }

    /// Returns `true` if the error came from the operating system, either
    /// while opening a log or while reading from its source.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Storage(_))
    }

    /// Returns the underlying I/O error kind, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io(e) => Some(e.kind()),
            Self::Storage(e) => Some(e.io_kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_classification() {
        let mismatch = CoreError::ChecksumMismatch {
            offset: 3,
            expected: 1,
            actual: 2,
        };
        let too_large = CoreError::RecordTooLarge {
            offset: 0,
            length: 10,
            max: 5,
        };
        let truncated = CoreError::TruncatedRecord {
            offset: 0,
            length: 10,
            available: 4,
        };

        assert!(mismatch.is_corruption());
        assert!(too_large.is_corruption());
        assert!(!truncated.is_corruption());
        assert!(!CoreError::Closed.is_corruption());
        assert!(!CoreError::invalid_configuration("x").is_corruption());
    }

    #[test]
    fn io_classification_covers_open_and_read_failures() {
        let open = CoreError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let read = CoreError::from(blockrec_storage::StorageError::from(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "gone",
        )));

        assert!(open.is_io());
        assert!(read.is_io());
        assert_eq!(open.io_kind(), Some(io::ErrorKind::NotFound));
        assert_eq!(read.io_kind(), Some(io::ErrorKind::UnexpectedEof));
        assert!(!open.is_corruption());
        assert!(!CoreError::Closed.is_io());
        assert_eq!(CoreError::Closed.io_kind(), None);
    }

    #[test]
    fn messages_name_the_offset() {
        let err = CoreError::ChecksumMismatch {
            offset: 7,
            expected: 0xdead_beef,
            actual: 0x0000_0001,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch at block offset 7: expected deadbeef, got 00000001"
        );
    }
}
