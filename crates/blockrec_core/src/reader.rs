//! Record-level access to an open log.

use crate::codec::{Record, RecordCodec};
use crate::config::ReaderConfig;
use crate::error::{CoreError, CoreResult};
use crate::scanner::{ScanSummary, Scanner};
use blockrec_storage::{ByteSource, FileSource};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Reads records from one open byte source with a fixed block size.
///
/// Each read costs one or two source reads: one for the first block, and a
/// second only when the payload does not fit in that block.
///
/// # Thread Safety
///
/// `read_at` takes `&self` and keeps no cursor, so a reader can be shared
/// between threads when its source is `Sync`. Scan cursors belong to the
/// [`Scanner`] returned by [`Reader::records`], not to the reader.
///
/// # Example
///
/// ```no_run
/// use blockrec_core::Reader;
///
/// let mut reader = Reader::open("records.log", 4096)?;
/// if let Some(record) = reader.read_at(0)? {
///     println!("{} bytes, next at {}", record.payload.len(), record.next_offset);
/// }
/// reader.scan(0, |payload, offset, _next| {
///     println!("{offset}: {payload:?}");
///     Ok::<_, blockrec_core::CoreError>(())
/// })?;
/// reader.close()?;
/// # Ok::<(), blockrec_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct Reader<S = FileSource> {
    source: Option<S>,
    codec: RecordCodec,
}

impl Reader<FileSource> {
    /// Opens the log at `path` read-only.
    ///
    /// A `block_size` of `0` selects the default of 16 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] for a block size below 16
    /// (checked before the file is touched), or the I/O error from opening
    /// the file.
    pub fn open(path: impl AsRef<Path>, block_size: u32) -> CoreResult<Self> {
        Self::open_with_config(path, ReaderConfig::new().block_size(block_size))
    }

    /// Opens the log at `path` with a full configuration.
    ///
    /// # Errors
    ///
    /// See [`Reader::open`].
    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> CoreResult<Self> {
        let config = config.resolve()?;
        let path = path.as_ref();
        let file = File::open(path)?;

        debug!(
            path = %path.display(),
            block_size = config.block_size,
            "opened record log"
        );
        Ok(Self {
            source: Some(FileSource::from_file(file)),
            codec: RecordCodec::from_config(config),
        })
    }
}

impl<S: ByteSource> Reader<S> {
    /// Wraps an already open byte source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] for a block size below 16.
    pub fn from_source(source: S, block_size: u32) -> CoreResult<Self> {
        Self::from_source_with_config(source, ReaderConfig::new().block_size(block_size))
    }

    /// Wraps an already open byte source with a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] for a block size below 16.
    pub fn from_source_with_config(source: S, config: ReaderConfig) -> CoreResult<Self> {
        let config = config.resolve()?;
        Ok(Self {
            source: Some(source),
            codec: RecordCodec::from_config(config),
        })
    }

    /// Returns the block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.codec.block_size()
    }

    /// Returns the codec used by this reader.
    #[must_use]
    pub fn codec(&self) -> RecordCodec {
        self.codec
    }

    /// Returns `true` once [`Reader::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    fn source(&self) -> CoreResult<&S> {
        self.source.as_ref().ok_or(CoreError::Closed)
    }

    /// Reads the record at `block_offset`.
    ///
    /// Returns `Ok(None)` when no complete header exists at that offset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close, and otherwise the codec's
    /// errors unchanged.
    pub fn read_at(&self, block_offset: u64) -> CoreResult<Option<Record>> {
        self.codec.decode_at(self.source()?, block_offset)
    }

    /// Returns an iterator over the records from `start_offset` on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close.
    pub fn records(&self, start_offset: u64) -> CoreResult<Scanner<&S>> {
        Ok(Scanner::new(self.source()?, self.codec, start_offset))
    }

    /// Visits every record from `start_offset` on, skipping corrupt blocks.
    ///
    /// See [`Scanner::for_each_record`] for the visitor contract.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] after close, the visitor's error, or a
    /// truncation or storage error from the log.
    pub fn scan<F, E>(&self, start_offset: u64, visit: F) -> Result<ScanSummary, E>
    where
        F: FnMut(&[u8], u64, u64) -> Result<(), E>,
        E: From<CoreError>,
    {
        self.records(start_offset)?.for_each_record(visit)
    }

    /// Releases the underlying source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Closed`] if the reader was already closed.
    pub fn close(&mut self) -> CoreResult<()> {
        let source = self.source.take().ok_or(CoreError::Closed)?;
        drop(source);
        debug!("closed record log");
        Ok(())
    }
}
