//! CLI command implementations.

pub mod dump;
pub mod read;
pub mod verify;

use blockrec_core::Record;
use serde::Serialize;

/// Record representation for output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RecordInfo {
    /// Block offset of the record.
    pub offset: u64,
    /// Block offset of the following record.
    pub next_offset: u64,
    /// Payload size in bytes.
    pub length: usize,
    /// Payload as UTF-8 if it decodes cleanly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Payload hex-encoded, truncated to the first 32 bytes.
    pub hex: String,
}

impl From<&Record> for RecordInfo {
    fn from(record: &Record) -> Self {
        Self::new(&record.payload, record.offset, record.next_offset)
    }
}

impl RecordInfo {
    /// Builds the printable form of one record.
    pub fn new(payload: &[u8], offset: u64, next_offset: u64) -> Self {
        Self {
            offset,
            next_offset,
            length: payload.len(),
            text: std::str::from_utf8(payload).ok().map(str::to_owned),
            hex: hex_encode(&payload[..payload.len().min(32)]),
        }
    }

    fn print_text(&self) {
        print!(
            "[{:08}] next={:08} len={:>6}",
            self.offset, self.next_offset, self.length
        );
        match &self.text {
            Some(text) => print!(" {:?}", preview(text)),
            None => print!(" hex={}", self.hex),
        }
        println!();
    }
}

fn preview(text: &str) -> String {
    text.chars().take(60).collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
