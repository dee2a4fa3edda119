//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use blockrec_testkit::LogBuilder;

/// Generate patterned payload data of the specified size.
pub fn patterned_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Build a log of `count` records with `payload_size` bytes each.
pub fn uniform_log(block_size: u32, count: usize, payload_size: usize) -> LogBuilder {
    let payload = patterned_data(payload_size);
    (0..count).fold(LogBuilder::new(block_size), |log, _| log.push(&payload))
}

/// Build a log of `count` records whose sizes cycle up to `max_size` bytes.
pub fn mixed_log(block_size: u32, count: usize, max_size: usize) -> LogBuilder {
    LogBuilder::new(block_size).extend((0..count).map(|i| patterned_data((i * 37) % (max_size + 1))))
}

/// Build a log of zero-filled records with every `every`-th record damaged.
///
/// The flipped bit sits in byte 4 of the payload, which stays clear of the
/// length field of every block boundary for block sizes of 32 and up, so the
/// scanner skips the damaged record block by block instead of stopping.
pub fn damaged_log(block_size: u32, count: usize, payload_size: usize, every: usize) -> LogBuilder {
    let payload = vec![0u8; payload_size.max(5)];
    let log = (0..count).fold(LogBuilder::new(block_size), |log, _| log.push(&payload));
    (0..count)
        .step_by(every.max(1))
        .fold(log, |log, record| log.corrupt_payload_bit(record, 4 * 8))
}
