//! Property tests for decoding and scanning generated logs.

use blockrec_core::{decode_at, CoreError, Reader, RecordCodec, Scanner, HEADER_SIZE};
use blockrec_storage::InMemorySource;
use blockrec_testkit::prelude::*;
use proptest::prelude::*;

fn scan_payloads(log: LogBuilder) -> (Vec<(Vec<u8>, u64)>, u64) {
    let block_size = log.block_size();
    let reader = Reader::from_source(log.into_source(), block_size).unwrap();
    let mut seen = Vec::new();
    let summary = reader
        .scan(0, |payload, offset, _| {
            seen.push((payload.to_vec(), offset));
            Ok::<_, CoreError>(())
        })
        .unwrap();
    (seen, summary.skipped_blocks)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scan_visits_every_record_in_order((log, payloads) in log_strategy(12)) {
        let offsets = log.offsets().to_vec();
        let (seen, skipped) = scan_payloads(log);

        let expected: Vec<(Vec<u8>, u64)> = payloads.into_iter().zip(offsets).collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(skipped, 0);
    }

    #[test]
    fn next_offset_matches_footprint(
        payload in payload_strategy(),
        block_size in block_size_strategy(),
    ) {
        let source = LogBuilder::new(block_size).push(&payload).into_source();
        let record = decode_at(&source, 0, block_size).unwrap().unwrap();

        let expected = (16 + payload.len() as u64).div_ceil(u64::from(block_size));
        prop_assert_eq!(record.next_offset, expected);
        prop_assert_eq!(record.payload, payload);
    }

    #[test]
    fn bit_flip_skips_only_the_damaged_record(
        block_size in block_size_strategy(),
        payloads in payloads_strategy(8),
        damaged_len in 1usize..512,
        position in any::<prop::sample::Index>(),
        byte in any::<prop::sample::Index>(),
        bit in 0usize..8,
    ) {
        // A zero-filled record reads as a run of empty headers with bad
        // checksums, as long as the flip stays out of their length fields.
        let flippable: Vec<usize> = (0..damaged_len)
            .filter(|i| (HEADER_SIZE + i) % block_size as usize >= 4)
            .collect();
        prop_assume!(!flippable.is_empty());
        let flipped = flippable[byte.index(flippable.len())];

        let victim = position.index(payloads.len() + 1);
        let mut all = payloads;
        all.insert(victim, vec![0u8; damaged_len]);

        let log = LogBuilder::new(block_size).extend(&all);
        let offsets = log.offsets().to_vec();
        let footprint = RecordCodec::new(block_size)
            .unwrap()
            .footprint_blocks(damaged_len as u32);
        let damaged = log.corrupt_payload_bit(victim, flipped * 8 + bit);

        let bytes = InMemorySource::with_data(damaged.bytes().to_vec());
        let direct = decode_at(&bytes, offsets[victim], block_size);
        prop_assert!(
            matches!(direct, Err(CoreError::ChecksumMismatch { .. })),
            "expected ChecksumMismatch, got {:?}",
            direct
        );

        let (seen, skipped) = scan_payloads(damaged);
        let expected: Vec<(Vec<u8>, u64)> = all
            .into_iter()
            .zip(offsets.iter().copied())
            .enumerate()
            .filter(|(i, _)| *i != victim)
            .map(|(_, entry)| entry)
            .collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(skipped, footprint);
    }
}

#[test]
fn corrupt_record_between_valid_ones_is_skipped() {
    let log = LogBuilder::new(16)
        .push(b"before")
        .push(&[0u8; 24])
        .push(b"after")
        .corrupt_payload_bit(1, 6 * 8);
    let offsets = log.offsets().to_vec();

    let (seen, skipped) = scan_payloads(log);
    assert_eq!(
        seen,
        vec![(b"before".to_vec(), offsets[0]), (b"after".to_vec(), offsets[2])]
    );
    assert_eq!(skipped, offsets[2] - offsets[1]);
}

#[test]
fn zeroed_region_between_records_is_skipped() {
    let log = LogBuilder::new(32).push(b"x").zero_blocks(5).push(b"y");
    let (seen, skipped) = scan_payloads(log);
    assert_eq!(seen, vec![(b"x".to_vec(), 0), (b"y".to_vec(), 6)]);
    assert_eq!(skipped, 5);
}

#[test]
fn bad_checksum_between_records_is_skipped() {
    let mut forged = Vec::new();
    forged.extend_from_slice(&4u32.to_le_bytes());
    forged.extend_from_slice(&0xdead_beef_u32.to_le_bytes());
    forged.extend_from_slice(&[0u8; 8]);
    forged.extend_from_slice(&[0u8; 4]);

    let log = LogBuilder::new(16)
        .push(b"one")
        .push_raw(&forged)
        .push(b"two");
    let (seen, _) = scan_payloads(log);
    let payloads: Vec<Vec<u8>> = seen.into_iter().map(|(p, _)| p).collect();
    assert_eq!(payloads, vec![b"one".to_vec(), b"two".to_vec()]);
}

#[test]
fn damaged_length_field_aborts_unless_capped() {
    let log = LogBuilder::new(16)
        .push(b"first")
        .push(b"second")
        .push(b"third")
        .set_length(1, 0x7fff_ffff);
    let offsets = log.offsets().to_vec();
    let source = log.into_source();

    // A length running past the end reads as an interrupted write.
    let mut seen = 0;
    let err = Scanner::new(&source, RecordCodec::new(16).unwrap(), 0)
        .for_each_record(|_, _, _| {
            seen += 1;
            Ok::<_, CoreError>(())
        })
        .unwrap_err();
    assert_eq!(seen, 1);
    assert!(matches!(err, CoreError::TruncatedRecord { offset, .. } if offset == offsets[1]));

    // With a length cap the same header is treated as corruption and skipped.
    let codec = RecordCodec::new(16).unwrap().with_max_record_len(1024);
    let payloads: Vec<Vec<u8>> = Scanner::new(&source, codec, 0)
        .map(|r| r.unwrap().payload)
        .collect();
    assert_eq!(payloads, vec![b"first".to_vec(), b"third".to_vec()]);
}

#[test]
fn truncated_tail_surfaces_after_valid_records() {
    let log = LogBuilder::new(16)
        .push(b"a")
        .push(b"b")
        .push(&[7u8; 100])
        .truncate_tail(40);
    let block_size = log.block_size();
    let reader = Reader::from_source(log.into_source(), block_size).unwrap();

    let results: Vec<_> = reader.records(0).unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(CoreError::TruncatedRecord { .. })));
}

#[test]
fn truncated_tail_after_corrupt_record_is_reported() {
    let log = LogBuilder::new(16)
        .push(b"ok")
        .push(&[0u8; 8])
        .push(&[7u8; 100])
        .corrupt_payload_bit(1, 5 * 8)
        .truncate_tail(40);
    let tail = log.offsets()[2];
    let block_size = log.block_size();
    let reader = Reader::from_source(log.into_source(), block_size).unwrap();

    let mut seen = 0;
    let err = reader
        .scan(0, |_, _, _| {
            seen += 1;
            Ok::<_, CoreError>(())
        })
        .unwrap_err();
    assert_eq!(seen, 1);
    assert!(matches!(err, CoreError::TruncatedRecord { offset, length: 100, .. } if offset == tail));
}

#[test]
fn visitor_can_cancel_scan() {
    #[derive(Debug)]
    #[allow(dead_code)]
    enum Stop {
        Enough,
        Scan(CoreError),
    }
    impl From<CoreError> for Stop {
        fn from(e: CoreError) -> Self {
            Stop::Scan(e)
        }
    }

    let log = LogBuilder::new(16).extend([b"1", b"2", b"3", b"4"]);
    let reader = Reader::from_source(log.into_source(), 16).unwrap();
    let mut visited = Vec::new();
    let result = reader.scan(0, |payload, _, _| {
        visited.push(payload.to_vec());
        if visited.len() == 2 {
            Err(Stop::Enough)
        } else {
            Ok(())
        }
    });

    assert!(matches!(result, Err(Stop::Enough)));
    assert_eq!(visited, vec![b"1".to_vec(), b"2".to_vec()]);
}
