//! Test fixtures and log helpers.
//!
//! The core crate only reads logs. The builder here produces the byte layout
//! a writer has to produce so tests can create valid, damaged, and truncated
//! logs.

use blockrec_core::{compute_checksum, Reader, HEADER_SIZE};
use blockrec_storage::{FileSource, InMemorySource};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Encodes one record, padded to a whole number of blocks.
///
/// # Panics
///
/// Panics if `block_size` is smaller than the header or the payload does not
/// fit a `u32` length.
pub fn encode_record(payload: &[u8], block_size: u32) -> Vec<u8> {
    assert!(block_size as usize >= HEADER_SIZE, "block size below header size");
    let length = u32::try_from(payload.len()).expect("payload too large for a record");

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&length.to_le_bytes());
    buf.extend_from_slice(&compute_checksum(payload).to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    buf.extend_from_slice(payload);

    let block = block_size as usize;
    buf.resize(buf.len().div_ceil(block) * block, 0);
    buf
}

/// Builds an in-memory log image record by record.
///
/// # Example
///
/// ```rust
/// use blockrec_testkit::LogBuilder;
///
/// let log = LogBuilder::new(16)
///     .push(b"first")
///     .push(b"second")
///     .corrupt_payload_bit(0, 3);
/// assert_eq!(log.offsets(), &[0, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct LogBuilder {
    block_size: u32,
    bytes: Vec<u8>,
    offsets: Vec<u64>,
}

impl LogBuilder {
    /// Creates an empty log for the given block size.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is smaller than the header.
    pub fn new(block_size: u32) -> Self {
        assert!(block_size as usize >= HEADER_SIZE, "block size below header size");
        Self {
            block_size,
            bytes: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Appends a valid record at the next block boundary.
    #[must_use]
    pub fn push(mut self, payload: &[u8]) -> Self {
        self.offsets.push(self.next_offset());
        self.bytes
            .extend_from_slice(&encode_record(payload, self.block_size));
        self
    }

    /// Appends every payload in order.
    #[must_use]
    pub fn extend<I, P>(self, payloads: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        payloads
            .into_iter()
            .fold(self, |log, payload| log.push(payload.as_ref()))
    }

    /// Appends raw bytes, padded with zeros to the next block boundary.
    ///
    /// The bytes are not recorded as a record offset.
    #[must_use]
    pub fn push_raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self.pad();
        self
    }

    /// Appends `blocks` zero-filled blocks.
    #[must_use]
    pub fn zero_blocks(mut self, blocks: usize) -> Self {
        let len = self.bytes.len() + blocks * self.block_size as usize;
        self.bytes.resize(len, 0);
        self
    }

    /// Flips one bit inside the payload of the `record`-th pushed record.
    ///
    /// # Panics
    ///
    /// Panics if the record does not exist or has an empty payload.
    #[must_use]
    pub fn corrupt_payload_bit(mut self, record: usize, bit: usize) -> Self {
        let start = self.byte_position(record);
        let length = self.payload_len(record);
        assert!(length > 0, "record {record} has no payload to corrupt");

        let bit = bit % (length * 8);
        self.bytes[start + HEADER_SIZE + bit / 8] ^= 1 << (bit % 8);
        self
    }

    /// Overwrites the length field of the `record`-th pushed record.
    #[must_use]
    pub fn set_length(mut self, record: usize, length: u32) -> Self {
        let start = self.byte_position(record);
        self.bytes[start..start + 4].copy_from_slice(&length.to_le_bytes());
        self
    }

    /// Removes `bytes` bytes from the end of the log.
    #[must_use]
    pub fn truncate_tail(mut self, bytes: usize) -> Self {
        let len = self.bytes.len().saturating_sub(bytes);
        self.bytes.truncate(len);
        self
    }

    /// Block size of the log.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Block offsets of the records pushed so far.
    #[must_use]
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Block offset the next record would start at.
    #[must_use]
    pub fn next_offset(&self) -> u64 {
        (self.bytes.len() as u64).div_ceil(u64::from(self.block_size))
    }

    /// Raw bytes of the log.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the builder, returning the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Consumes the builder, returning an in-memory byte source.
    #[must_use]
    pub fn into_source(self) -> InMemorySource {
        InMemorySource::with_data(self.bytes)
    }

    /// Writes the log to a fresh temporary file.
    ///
    /// # Panics
    ///
    /// Panics if the temporary file cannot be created or written.
    pub fn write_to_temp(&self) -> TempLog {
        TempLog::with_bytes(&self.bytes, self.block_size)
    }

    fn pad(&mut self) {
        let block = self.block_size as usize;
        let len = self.bytes.len().div_ceil(block) * block;
        self.bytes.resize(len, 0);
    }

    fn byte_position(&self, record: usize) -> usize {
        let offset = self.offsets[record];
        (offset * u64::from(self.block_size)) as usize
    }

    fn payload_len(&self, record: usize) -> usize {
        let start = self.byte_position(record);
        let len = &self.bytes[start..start + 4];
        u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize
    }
}

/// A log file in a temporary directory, removed on drop.
pub struct TempLog {
    path: PathBuf,
    block_size: u32,
    _temp_dir: TempDir,
}

impl TempLog {
    /// Creates a log file holding `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn with_bytes(bytes: &[u8], block_size: u32) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("records.log");

        let mut file = std::fs::File::create(&path).expect("Failed to create log file");
        file.write_all(bytes).expect("Failed to write log file");
        file.sync_all().expect("Failed to sync log file");

        Self {
            path,
            block_size,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends raw bytes to the end of the file.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn append(&self, bytes: &[u8]) {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .expect("Failed to open log file for append");
        file.write_all(bytes).expect("Failed to append to log file");
        file.sync_all().expect("Failed to sync log file");
    }

    /// Opens a reader over the file with the log's block size.
    ///
    /// # Panics
    ///
    /// Panics if the reader cannot be opened.
    pub fn open_reader(&self) -> Reader<FileSource> {
        Reader::open(&self.path, self.block_size).expect("Failed to open reader")
    }
}
