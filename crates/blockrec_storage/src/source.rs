//! Byte source trait definition.

use crate::error::StorageResult;
use std::sync::Arc;

/// A random-access, read-only byte source.
///
/// Byte sources are **opaque byte stores**. The record codec owns all
/// interpretation of the bytes; a source only hands out ranges of them.
///
/// # Invariants
///
/// - `read_at` returns at most `len` bytes
/// - `read_at` returns fewer than `len` bytes only at end of stream; an
///   implementation backed by an OS primitive that may return short reads
///   must loop until the buffer is full or EOF is reached
/// - An `offset` at or beyond `size()` yields an empty vector, not an error
/// - Sources must be `Send + Sync` for concurrent readers
///
/// # Implementors
///
/// - [`super::InMemorySource`] - For testing
/// - [`super::FileSource`] - For log files on disk
pub trait ByteSource: Send + Sync {
    /// Reads up to `len` bytes starting at byte position `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying resource fails. Reaching the
    /// end of the stream is reported by a short result.
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Returns the number of bytes currently available in the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    fn size(&self) -> StorageResult<u64> {
        (**self).size()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    fn size(&self) -> StorageResult<u64> {
        (**self).size()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Arc<T> {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    fn size(&self) -> StorageResult<u64> {
        (**self).size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemorySource;

    fn read_through<S: ByteSource>(source: S) -> Vec<u8> {
        source.read_at(0, 3).unwrap()
    }

    #[test]
    fn reference_is_a_source() {
        let source = InMemorySource::with_data(b"abcdef".to_vec());
        assert_eq!(read_through(&source), b"abc");
    }

    #[test]
    fn boxed_trait_object_is_a_source() {
        let source: Box<dyn ByteSource> = Box::new(InMemorySource::with_data(b"xyz".to_vec()));
        assert_eq!(source.size().unwrap(), 3);
        assert_eq!(read_through(source), b"xyz");
    }

    #[test]
    fn shared_source_is_a_source() {
        let source = Arc::new(InMemorySource::with_data(b"shared".to_vec()));
        let clone = Arc::clone(&source);
        assert_eq!(read_through(clone), b"sha");
        assert_eq!(source.size().unwrap(), 6);
    }
}
