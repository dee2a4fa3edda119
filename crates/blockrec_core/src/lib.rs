//! # blockrec Core
//!
//! Reading of variable-length records stored in an append-only,
//! block-aligned log.
//!
//! This crate provides:
//! - The record codec: header layout, checksum verification, offset arithmetic
//! - [`Reader`]: record access by block offset over an open byte source
//! - [`Scanner`]: sequential traversal that steps over corrupt blocks
//!
//! Records are addressed in blocks, not bytes. Every record starts on a block
//! boundary and is followed by padding up to the next one, so a record's
//! address stays compact and neighbouring records never share a block.
//!
//! ## Example
//!
//! ```rust
//! use blockrec_core::{CoreError, Reader};
//! use blockrec_storage::InMemorySource;
//!
//! let reader = Reader::from_source(InMemorySource::new(), 16)?;
//! assert!(reader.read_at(0)?.is_none());
//!
//! let summary = reader.scan(0, |_payload, _offset, _next| Ok::<_, CoreError>(()))?;
//! assert_eq!(summary.records, 0);
//! # Ok::<(), CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod config;
mod error;
mod reader;
mod scanner;

pub use codec::{compute_checksum, decode_at, Record, RecordCodec, RecordHeader, HEADER_SIZE};
pub use config::{ReaderConfig, ResolvedConfig, DEFAULT_BLOCK_SIZE, MIN_BLOCK_SIZE};
pub use error::{CoreError, CoreResult};
pub use reader::Reader;
pub use scanner::{ScanSummary, Scanner};

pub use blockrec_storage::{ByteSource, FileSource, InMemorySource};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
