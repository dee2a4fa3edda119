//! Read command: print a single record.

use super::RecordInfo;
use blockrec_core::{Reader, ReaderConfig};
use std::path::Path;

/// Prints the record stored at `offset`, or reports end of data.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    offset: u64,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = Reader::open_with_config(path, config)?;
    let info = reader.read_at(offset)?.as_ref().map(RecordInfo::from);

    match (format, info) {
        ("json", info) => println!("{}", serde_json::to_string_pretty(&info)?),
        (_, Some(info)) => info.print_text(),
        (_, None) => println!("End of data at block offset {offset}"),
    }

    Ok(())
}
