//! Verify command: check every record in a log.

use blockrec_core::{ByteSource, CoreError, Reader, ReaderConfig};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Verification result.
#[derive(Debug, Default, Serialize)]
pub struct VerifyResult {
    /// Records that decoded with a valid checksum.
    pub valid_records: u64,
    /// Blocks skipped because they held corrupt data.
    pub skipped_blocks: u64,
    /// Block offset where verification stopped.
    pub end_offset: u64,
    /// Set when the log ends in a partially written record.
    pub truncated_tail: bool,
    /// Errors that stopped verification.
    pub errors: Vec<String>,
}

impl VerifyResult {
    /// Returns `true` if the log is fully intact.
    pub fn is_clean(&self) -> bool {
        self.skipped_blocks == 0 && !self.truncated_tail && self.errors.is_empty()
    }
}

/// Verifies the log at `path` starting at `offset`.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    offset: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying record log: {}", path.display());
    println!();

    let reader = Reader::open_with_config(path, config)?;
    let result = check(&reader, offset)?;

    println!("Verification Results:");
    println!("  Valid records:  {}", result.valid_records);
    println!("  Skipped blocks: {}", result.skipped_blocks);
    println!("  End offset:     {}", result.end_offset);
    println!();

    if result.truncated_tail {
        println!("✗ Log ends in a truncated record");
    }
    if result.skipped_blocks > 0 {
        println!("✗ {} corrupt block(s) skipped", result.skipped_blocks);
    }
    for error in &result.errors {
        println!("  - {error}");
    }

    if result.is_clean() {
        println!("✓ Log verification passed");
        Ok(())
    } else {
        Err("Verification failed".into())
    }
}

/// Walks the log and tallies valid records and damage.
pub fn check<S: ByteSource>(reader: &Reader<S>, offset: u64) -> Result<VerifyResult, CoreError> {
    let mut result = VerifyResult::default();
    let mut scanner = reader.records(offset)?;

    for record in scanner.by_ref() {
        match record {
            Ok(record) => {
                debug!(offset = record.offset, len = record.payload.len(), "record ok");
                result.valid_records += 1;
            }
            Err(CoreError::TruncatedRecord { offset, .. }) => {
                result.truncated_tail = true;
                result.errors.push(format!("truncated record at block {offset}"));
            }
            Err(e) => result.errors.push(e.to_string()),
        }
    }

    let summary = scanner.summary();
    result.skipped_blocks = summary.skipped_blocks;
    result.end_offset = summary.end_offset;
    info!(
        valid = result.valid_records,
        skipped = result.skipped_blocks,
        "verification finished"
    );
    Ok(result)
}
