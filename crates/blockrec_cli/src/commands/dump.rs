//! Dump command: print records sequentially.

use super::RecordInfo;
use blockrec_core::{ByteSource, CoreResult, Reader, ReaderConfig, ScanSummary};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Dump output with the records that were read and how the scan ended.
#[derive(Debug, Serialize)]
pub struct DumpOutput {
    /// Records in log order.
    pub records: Vec<RecordInfo>,
    /// Blocks skipped because they held corrupt data.
    pub skipped_blocks: u64,
    /// Block offset where the dump stopped.
    pub end_offset: u64,
    /// Error that ended the dump early, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Prints up to `limit` records starting at `offset`.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    offset: u64,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = Reader::open_with_config(path, config)?;
    let output = collect(&reader, offset, limit)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&output)?),
        _ => {
            println!("Log: {}", path.display());
            println!("Block size: {}", reader.block_size());
            println!();
            for record in &output.records {
                record.print_text();
            }
            println!();
            println!(
                "{} records, {} skipped blocks, stopped at block {}",
                output.records.len(),
                output.skipped_blocks,
                output.end_offset
            );
            if let Some(error) = &output.error {
                println!("Stopped early: {error}");
            }
        }
    }

    Ok(())
}

/// Reads up to `limit` records starting at `offset`.
///
/// A scan error is reported in the output instead of failing the dump, so
/// records read before a truncated tail still get printed.
pub fn collect<S: ByteSource>(
    reader: &Reader<S>,
    offset: u64,
    limit: Option<usize>,
) -> CoreResult<DumpOutput> {
    let mut scanner = reader.records(offset)?;
    let mut records = Vec::new();
    let mut error = None;

    for result in scanner.by_ref().take(limit.unwrap_or(usize::MAX)) {
        match result {
            Ok(record) => records.push(RecordInfo::from(&record)),
            Err(e) => {
                error = Some(e.to_string());
                break;
            }
        }
    }

    let ScanSummary {
        skipped_blocks,
        end_offset,
        ..
    } = scanner.summary();
    info!(records = records.len(), skipped_blocks, "dump finished");

    Ok(DumpOutput {
        records,
        skipped_blocks,
        end_offset,
        error,
    })
}
