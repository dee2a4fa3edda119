//! # blockrec Testkit
//!
//! Test utilities for blockrec.
//!
//! This crate provides:
//! - A fixture builder that lays records out the way a writer must
//! - Temporary log files with automatic cleanup
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use blockrec_testkit::prelude::*;
//!
//! let log = LogBuilder::new(16).push(b"a").push(b"").push(b"hello");
//! assert_eq!(log.offsets(), &[0, 2, 3]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
