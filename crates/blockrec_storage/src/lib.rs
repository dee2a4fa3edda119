//! # blockrec Storage
//!
//! Random-access byte sources for blockrec record logs.
//!
//! This crate provides the lowest-level read abstraction used by the record
//! codec. Byte sources are **opaque byte stores** - they do not interpret
//! the data they hold.
//!
//! ## Design Principles
//!
//! - A source answers one question: "give me up to N bytes at byte position P"
//! - A short read always means end of stream, never "try again"
//! - No knowledge of record headers, blocks, or checksums
//! - Must be `Send + Sync` so independent readers can share a source
//!
//! ## Available Sources
//!
//! - [`InMemorySource`] - For testing and ephemeral logs
//! - [`FileSource`] - Read-only access to a log file on disk
//!
//! ## Example
//!
//! ```rust
//! use blockrec_storage::{ByteSource, InMemorySource};
//!
//! let source = InMemorySource::with_data(b"hello world".to_vec());
//! assert_eq!(source.read_at(6, 5).unwrap(), b"world");
//! // Reads past the end are short, not errors.
//! assert_eq!(source.read_at(6, 100).unwrap(), b"world");
//! assert!(source.read_at(64, 4).unwrap().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod source;

pub use error::{StorageError, StorageResult};
pub use file::FileSource;
pub use memory::InMemorySource;
pub use source::ByteSource;
