//! Reader configuration.

use crate::codec::HEADER_SIZE;
use crate::error::{CoreError, CoreResult};

/// Smallest usable block size: one block must hold a full header.
pub const MIN_BLOCK_SIZE: u32 = HEADER_SIZE as u32;

/// Block size used when the caller passes `0`.
pub const DEFAULT_BLOCK_SIZE: u32 = MIN_BLOCK_SIZE;

/// Configuration for opening a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Addressing granularity in bytes. `0` selects [`DEFAULT_BLOCK_SIZE`].
    pub block_size: u32,

    /// Largest payload length accepted from a header before any buffer is
    /// allocated for it.
    pub max_record_len: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            block_size: 0,
            max_record_len: u32::MAX,
        }
    }
}

impl ReaderConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size.
    #[must_use]
    pub const fn block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the maximum accepted payload length.
    #[must_use]
    pub const fn max_record_len(mut self, max_record_len: u32) -> Self {
        self.max_record_len = max_record_len;
        self
    }

    /// Validates the configuration and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] if the block size is
    /// non-zero and smaller than [`MIN_BLOCK_SIZE`].
    pub fn resolve(self) -> CoreResult<ResolvedConfig> {
        let block_size = match self.block_size {
            0 => DEFAULT_BLOCK_SIZE,
            size => validate_block_size(size)?,
        };

        Ok(ResolvedConfig {
            block_size,
            max_record_len: self.max_record_len,
        })
    }
}

/// A validated configuration; `block_size` is at least [`MIN_BLOCK_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Addressing granularity in bytes.
    pub block_size: u32,
    /// Largest accepted payload length.
    pub max_record_len: u32,
}

/// Rejects block sizes that cannot hold a record header.
pub(crate) fn validate_block_size(block_size: u32) -> CoreResult<u32> {
    if block_size < MIN_BLOCK_SIZE {
        return Err(CoreError::invalid_configuration(format!(
            "block size {block_size} is smaller than the {MIN_BLOCK_SIZE}-byte record header"
        )));
    }
    Ok(block_size)
}
