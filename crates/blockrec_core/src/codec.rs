//! Record layout and decoding.
//!
//! A log is a sequence of records, each starting on a block boundary:
//!
//! ```text
//! offset (bytes)   field        size
//! 0                length       4    u32 LE, payload byte length
//! 4                checksum     4    u32 LE, masked CRC-32 of the payload
//! 8                reserved     8    ignored on read
//! 16               payload      `length` bytes
//! 16+length        padding      up to the next block boundary
//! ```
//!
//! The checksum is masked (see [`compute_checksum`]), so it is not the plain
//! CRC-32 of the payload. A writer that stores an unmasked CRC-32 produces
//! records that all fail verification here.
//!
//! Records are addressed by block offset: the byte position of block offset
//! `o` is `o * block_size`. A record occupies
//! `ceil((16 + length) / block_size)` blocks and the next record starts
//! right after it.

use crate::config::{validate_block_size, ResolvedConfig};
use crate::error::{CoreError, CoreResult};
use blockrec_storage::ByteSource;

/// Size of the fixed record header in bytes.
pub const HEADER_SIZE: usize = 16;

const CHECKSUM_MASK_DELTA: u32 = 0xa282_ead8;

/// Computes the checksum stored in a record header.
///
/// This is the CRC-32 (IEEE) of the payload, rotated right by 15 bits and
/// offset by a constant. The mask keeps an all-zero header from validating
/// as an empty record, so zero-filled regions are never mistaken for data.
#[must_use]
pub fn compute_checksum(payload: &[u8]) -> u32 {
    let crc = crc32fast::hash(payload);
    crc.rotate_right(15).wrapping_add(CHECKSUM_MASK_DELTA)
}

/// Decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Payload length in bytes.
    pub length: u32,
    /// Checksum of the payload, see [`compute_checksum`].
    pub checksum: u32,
    /// Reserved bytes, carried but not interpreted.
    pub reserved: [u8; 8],
}

impl RecordHeader {
    /// Parses a header from exactly [`HEADER_SIZE`] bytes.
    #[must_use]
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Self {
        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&buf[8..16]);
        Self {
            length: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            checksum: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            reserved,
        }
    }
}

/// A record decoded from a byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Verified payload bytes.
    pub payload: Vec<u8>,
    /// Block offset the record was read from.
    pub offset: u64,
    /// Block offset where the following record starts.
    pub next_offset: u64,
}

impl Record {
    /// Number of blocks the record occupies.
    #[must_use]
    pub fn footprint_blocks(&self) -> u64 {
        self.next_offset - self.offset
    }
}

/// Decoder for block-aligned records.
///
/// The codec is stateless apart from its parameters: decoding never moves a
/// cursor, it returns the offset of the following record instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCodec {
    block_size: u32,
    max_record_len: u32,
}

impl RecordCodec {
    /// Creates a codec for the given block size.
    ///
    /// Unlike the reader, the codec does not substitute a default for `0`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] if `block_size` is smaller
    /// than [`HEADER_SIZE`].
    pub fn new(block_size: u32) -> CoreResult<Self> {
        Ok(Self {
            block_size: validate_block_size(block_size)?,
            max_record_len: u32::MAX,
        })
    }

    /// Creates a codec from an already validated configuration.
    #[must_use]
    pub fn from_config(config: ResolvedConfig) -> Self {
        Self {
            block_size: config.block_size,
            max_record_len: config.max_record_len,
        }
    }

    /// Caps the payload length accepted from a header.
    #[must_use]
    pub const fn with_max_record_len(mut self, max_record_len: u32) -> Self {
        self.max_record_len = max_record_len;
        self
    }

    /// Returns the block size in bytes.
    #[must_use]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Returns the largest accepted payload length.
    #[must_use]
    pub const fn max_record_len(&self) -> u32 {
        self.max_record_len
    }

    /// Byte position of a block offset, or `None` if it does not fit in `u64`.
    #[must_use]
    pub fn byte_position(&self, block_offset: u64) -> Option<u64> {
        block_offset.checked_mul(u64::from(self.block_size))
    }

    /// Number of blocks occupied by a record with `length` payload bytes.
    #[must_use]
    pub fn footprint_blocks(&self, length: u32) -> u64 {
        let total = HEADER_SIZE as u64 + u64::from(length);
        total.div_ceil(u64::from(self.block_size))
    }

    /// Block offset of the record following one at `block_offset`.
    #[must_use]
    pub fn next_offset(&self, block_offset: u64, length: u32) -> u64 {
        block_offset.saturating_add(self.footprint_blocks(length))
    }

    /// Decodes the record starting at `block_offset`.
    ///
    /// Returns `Ok(None)` when fewer than [`HEADER_SIZE`] bytes remain at that
    /// position, which is the normal end of a log.
    ///
    /// The first read covers one whole block, so a record that fits in a
    /// single block costs one read. Longer payloads are bound-checked against
    /// the source size before their buffer is allocated.
    ///
    /// # Errors
    ///
    /// - [`CoreError::RecordTooLarge`] if the header declares more than
    ///   `max_record_len` bytes
    /// - [`CoreError::TruncatedRecord`] if the stream ends inside the payload
    /// - [`CoreError::ChecksumMismatch`] if the payload fails verification
    /// - [`CoreError::Storage`] if the source fails
    pub fn decode_at<S: ByteSource + ?Sized>(
        &self,
        source: &S,
        block_offset: u64,
    ) -> CoreResult<Option<Record>> {
        let Some(position) = self.byte_position(block_offset) else {
            return Ok(None);
        };

        let mut first = source.read_at(position, self.block_size as usize)?;
        let Some(header_bytes) = first.first_chunk::<HEADER_SIZE>() else {
            return Ok(None);
        };
        let header = RecordHeader::from_bytes(header_bytes);

        if header.length > self.max_record_len {
            return Err(CoreError::RecordTooLarge {
                offset: block_offset,
                length: header.length,
                max: self.max_record_len,
            });
        }

        let record_end = HEADER_SIZE as u64 + u64::from(header.length);
        let payload = if record_end <= first.len() as u64 {
            first.truncate(record_end as usize);
            first.split_off(HEADER_SIZE)
        } else {
            self.read_payload(source, block_offset, position, header.length)?
        };

        let actual = compute_checksum(&payload);
        if actual != header.checksum {
            return Err(CoreError::ChecksumMismatch {
                offset: block_offset,
                expected: header.checksum,
                actual,
            });
        }

        Ok(Some(Record {
            payload,
            offset: block_offset,
            next_offset: self.next_offset(block_offset, header.length),
        }))
    }

    fn read_payload<S: ByteSource + ?Sized>(
        &self,
        source: &S,
        block_offset: u64,
        position: u64,
        length: u32,
    ) -> CoreResult<Vec<u8>> {
        let payload_position = position.saturating_add(HEADER_SIZE as u64);
        let available = source.size()?.saturating_sub(payload_position);
        if available < u64::from(length) {
            return Err(CoreError::TruncatedRecord {
                offset: block_offset,
                length,
                available,
            });
        }

        let payload = source.read_at(payload_position, length as usize)?;
        if payload.len() < length as usize {
            return Err(CoreError::TruncatedRecord {
                offset: block_offset,
                length,
                available: payload.len() as u64,
            });
        }
        Ok(payload)
    }
}

/// Decodes the record at `block_offset` in a log with the given block size.
///
/// Returns the record (payload and next offset), or `Ok(None)` at the end of
/// the data.
///
/// # Errors
///
/// Fails with [`CoreError::InvalidConfiguration`] if `block_size < 16`, and
/// otherwise as [`RecordCodec::decode_at`].
///
/// # Example
///
/// ```rust
/// use blockrec_core::codec::decode_at;
/// use blockrec_storage::InMemorySource;
///
/// let empty = InMemorySource::new();
/// assert!(decode_at(&empty, 0, 16).unwrap().is_none());
/// assert!(decode_at(&empty, 0, 8).is_err());
/// ```
pub fn decode_at<S: ByteSource + ?Sized>(
    source: &S,
    block_offset: u64,
    block_size: u32,
) -> CoreResult<Option<Record>> {
    RecordCodec::new(block_size)?.decode_at(source, block_offset)
}
