//! Sequential record scanning with corruption skipping.
//!
//! A scan walks records in offset order starting from a caller-chosen block
//! offset. When a record fails verification the scanner assumes the block at
//! the current offset is damaged and retries one block further on, until a
//! record verifies again or the data ends.

use crate::codec::{Record, RecordCodec};
use crate::error::{CoreError, CoreResult};
use blockrec_storage::ByteSource;
use tracing::{debug, trace, warn};

/// Counters describing a finished or interrupted scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of records yielded.
    pub records: u64,
    /// Number of blocks stepped over while resynchronizing.
    pub skipped_blocks: u64,
    /// Block offset the scan stopped at.
    pub end_offset: u64,
}

/// A streaming iterator over the records of a log.
///
/// # Error Handling
///
/// - End of data ends the iteration without an error
/// - Checksum mismatches and oversized headers skip exactly one block
/// - Truncation and storage failures are yielded once, then the iterator
///   is fused
///
/// # Example
///
/// ```rust
/// use blockrec_core::codec::RecordCodec;
/// use blockrec_core::Scanner;
/// use blockrec_storage::InMemorySource;
///
/// let source = InMemorySource::new();
/// let codec = RecordCodec::new(16).unwrap();
/// let mut scanner = Scanner::new(&source, codec, 0);
/// assert!(scanner.next().is_none());
/// ```
#[derive(Debug)]
pub struct Scanner<S> {
    source: S,
    codec: RecordCodec,
    offset: u64,
    resyncing: bool,
    finished: bool,
    records: u64,
    skipped_blocks: u64,
}

impl<S: ByteSource> Scanner<S> {
    /// Creates a scanner starting at `start_offset`.
    ///
    /// Pass a reference (`&source`) to scan a source without giving it up.
    pub fn new(source: S, codec: RecordCodec, start_offset: u64) -> Self {
        Self {
            source,
            codec,
            offset: start_offset,
            resyncing: false,
            finished: false,
            records: 0,
            skipped_blocks: 0,
        }
    }

    /// Block offset the next decode will be attempted at.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Counters for the records seen so far.
    #[must_use]
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            records: self.records,
            skipped_blocks: self.skipped_blocks,
            end_offset: self.offset,
        }
    }

    /// Feeds every remaining record to `visit`.
    ///
    /// The visitor receives `(payload, record_offset, next_offset)`. An error
    /// returned by the visitor stops the scan and is returned unchanged; scan
    /// errors are converted into `E`.
    ///
    /// # Errors
    ///
    /// Returns the visitor's error, or a truncation or storage error from
    /// the log.
    pub fn for_each_record<F, E>(&mut self, mut visit: F) -> Result<ScanSummary, E>
    where
        F: FnMut(&[u8], u64, u64) -> Result<(), E>,
        E: From<CoreError>,
    {
        for result in &mut *self {
            let record = result?;
            visit(&record.payload, record.offset, record.next_offset)?;
        }
        Ok(self.summary())
    }

    fn read_next_record(&mut self) -> CoreResult<Option<Record>> {
        loop {
            match self.codec.decode_at(&self.source, self.offset) {
                Ok(Some(record)) => {
                    if self.resyncing {
                        debug!(
                            offset = record.offset,
                            skipped_blocks = self.skipped_blocks,
                            "resynchronized on valid record"
                        );
                        self.resyncing = false;
                    }
                    trace!(
                        offset = record.offset,
                        next_offset = record.next_offset,
                        len = record.payload.len(),
                        "record"
                    );
                    self.offset = record.next_offset;
                    self.records += 1;
                    return Ok(Some(record));
                }
                Ok(None) => return Ok(None),
                Err(err) if err.is_corruption() => {
                    if self.resyncing {
                        debug!(offset = self.offset, error = %err, "skipping block");
                    } else {
                        warn!(offset = self.offset, error = %err, "corrupt record, resynchronizing");
                        self.resyncing = true;
                    }
                    self.skipped_blocks += 1;
                    self.offset = self.offset.saturating_add(1);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl<S: ByteSource> Iterator for Scanner<S> {
    type Item = CoreResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
