//! Property-based test generators using proptest.
//!
//! Provides strategies for generating logs that satisfy the layout
//! invariants, plus damage to apply to them.

use crate::fixtures::LogBuilder;
use blockrec_core::MIN_BLOCK_SIZE;
use proptest::prelude::*;

/// Strategy for valid block sizes, biased towards small ones so records
/// regularly span several blocks.
pub fn block_size_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => MIN_BLOCK_SIZE..=64,
        1 => prop::sample::select(vec![128u32, 512, 4096]),
    ]
}

/// Strategy for record payloads (arbitrary bytes, possibly empty).
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for a sequence of payloads.
pub fn payloads_strategy(max_records: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload_strategy(), 0..=max_records)
}

/// Strategy for a complete valid log together with its payloads.
pub fn log_strategy(max_records: usize) -> impl Strategy<Value = (LogBuilder, Vec<Vec<u8>>)> {
    (block_size_strategy(), payloads_strategy(max_records)).prop_map(|(block_size, payloads)| {
        let log = LogBuilder::new(block_size).extend(&payloads);
        (log, payloads)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_block_sizes_are_valid(block_size in block_size_strategy()) {
            prop_assert!(block_size >= MIN_BLOCK_SIZE);
        }

        #[test]
        fn generated_logs_are_block_aligned((log, payloads) in log_strategy(8)) {
            prop_assert_eq!(log.offsets().len(), payloads.len());
            prop_assert_eq!(log.bytes().len() % log.block_size() as usize, 0);
        }
    }
}
