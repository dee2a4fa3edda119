//! In-memory byte source for testing.

use crate::error::StorageResult;
use crate::source::ByteSource;

/// An in-memory byte source.
///
/// This source holds an immutable buffer and is suitable for:
/// - Unit tests of the record codec without file I/O
/// - Decoding logs that were already loaded into memory
///
/// # Example
///
/// ```rust
/// use blockrec_storage::{ByteSource, InMemorySource};
///
/// let source = InMemorySource::with_data(b"test data".to_vec());
/// assert_eq!(source.size().unwrap(), 9);
/// assert_eq!(source.read_at(5, 4).unwrap(), b"data");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    data: Vec<u8>,
}

impl InMemorySource {
    /// Creates a new empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source over pre-existing data.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Returns all bytes held by the source.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of bytes held by the source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the source holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for InMemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::with_data(data)
    }
}

impl ByteSource for InMemorySource {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = self.data.len();
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(size);
        let end = start.saturating_add(len).min(size);

        Ok(self.data[start..end].to_vec())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.len() as u64)
    }
}
