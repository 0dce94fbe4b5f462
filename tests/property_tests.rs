//! Property-based tests for recliner.
//!
//! These tests use proptest to verify universal properties across many
//! generated containers: variable-length integer coding round-trips, ordered
//! record delivery, offset bookkeeping, and seek behavior.

use proptest::prelude::*;

use recliner::reader::vint;
use recliner::{BytesSource, FileReader, RawConfig, ReaderError, SequenceFileReader, Value};

// ============================================================================
// Container Generators
// ============================================================================

const SYNC: [u8; 16] = *b"proptest-sync-01";

fn push_text(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&vint::encode_vint(s.len() as i32));
    buf.extend_from_slice(s.as_bytes());
}

/// Serialize `(int, text)` records into an uncompressed container, placing a
/// sync block before every `sync_every`-th record when requested.
fn build_container(records: &[(i32, String)], sync_every: Option<usize>) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"SEQ");
    buf.push(6);
    push_text(&mut buf, "org.apache.hadoop.io.IntWritable");
    push_text(&mut buf, "org.apache.hadoop.io.Text");
    buf.push(0);
    buf.push(0);
    buf.extend_from_slice(&0i32.to_be_bytes());
    buf.extend_from_slice(&SYNC);

    for (i, (key, value)) in records.iter().enumerate() {
        if let Some(n) = sync_every {
            if i > 0 && i % n == 0 {
                buf.extend_from_slice(&(-1i32).to_be_bytes());
                buf.extend_from_slice(&SYNC);
            }
        }
        let mut value_slot = vint::encode_vint(value.len() as i32);
        value_slot.extend_from_slice(value.as_bytes());
        let record_len = (4 + value_slot.len()) as i32;
        buf.extend_from_slice(&record_len.to_be_bytes());
        buf.extend_from_slice(&4i32.to_be_bytes());
        buf.extend_from_slice(&key.to_be_bytes());
        buf.extend_from_slice(&value_slot);
    }
    buf
}

fn open_reader(data: Vec<u8>) -> SequenceFileReader<BytesSource> {
    SequenceFileReader::open(BytesSource::new(data), "/data/prop.seq", &RawConfig::new())
        .expect("generated container opens")
}

/// Generate record batches of arbitrary int keys and unicode text values.
fn arb_records() -> impl Strategy<Value = Vec<(i32, String)>> {
    prop::collection::vec((any::<i32>(), ".{0,12}"), 0..32)
}

/// Generate a non-empty batch together with a valid record offset into it.
fn arb_records_with_target() -> impl Strategy<Value = (Vec<(i32, String)>, usize)> {
    prop::collection::vec((any::<i32>(), ".{0,12}"), 1..24)
        .prop_flat_map(|records| {
            let len = records.len();
            (Just(records), 0..len)
        })
}

// ============================================================================
// Variable-Length Integer Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Encoding any long and decoding it back yields the original value and
    /// consumes exactly the encoded bytes.
    #[test]
    fn prop_vlong_round_trip(value in any::<i64>()) {
        let encoded = vint::encode_vlong(value);
        let mut cursor = &encoded[..];
        let decoded = vint::read_vlong(&mut cursor).expect("decode");

        prop_assert_eq!(decoded, value);
        prop_assert!(cursor.is_empty(), "decoder left {} bytes", cursor.len());
    }

    /// The int coding is the long coding restricted to 32 bits.
    #[test]
    fn prop_vint_round_trip(value in any::<i32>()) {
        let encoded = vint::encode_vint(value);
        let mut cursor = &encoded[..];
        let decoded = vint::read_vint(&mut cursor).expect("decode");

        prop_assert_eq!(decoded, value);
        prop_assert!(cursor.is_empty());
    }

    /// Encodings take one to nine bytes, and exactly one byte on the
    /// single-byte range -112 through 127.
    #[test]
    fn prop_vlong_encoded_size(value in any::<i64>()) {
        let encoded = vint::encode_vlong(value);

        prop_assert!((1..=9).contains(&encoded.len()), "{} bytes", encoded.len());
        prop_assert_eq!(encoded.len() == 1, (-112..=127).contains(&value));
    }
}

// ============================================================================
// Ordered Delivery and Offset Properties
// ============================================================================

fn read_pair(reader: &mut SequenceFileReader<BytesSource>) -> (i32, String) {
    let record = reader.next().expect("record");
    let key = record.get("key").and_then(Value::as_i32).expect("int key");
    let value = record
        .get("value")
        .and_then(Value::as_str)
        .map(String::from)
        .expect("text value");
    (key, value)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any batch of records written to a container comes back in order and
    /// intact, with the offset counter reporting how many records have been
    /// produced so far.
    #[test]
    fn prop_records_round_trip_in_order(records in arb_records()) {
        let mut reader = open_reader(build_container(&records, None));

        for (i, expected) in records.iter().enumerate() {
            prop_assert!(reader.has_next().expect("look-ahead"));
            let pair = read_pair(&mut reader);
            prop_assert_eq!(&pair, expected);
            prop_assert_eq!(reader.current_offset(), i as i64 + 1);
        }
        prop_assert!(!reader.has_next().expect("end"));
        prop_assert!(matches!(
            reader.next().unwrap_err(),
            ReaderError::NoMoreRecords(_)
        ));
    }

    /// Extra look-ahead calls never change what is delivered or the offset.
    #[test]
    fn prop_lookahead_is_idempotent(records in arb_records(), probes in 1..4usize) {
        let mut reader = open_reader(build_container(&records, None));

        for expected in &records {
            for _ in 0..probes {
                prop_assert!(reader.has_next().expect("look-ahead"));
            }
            let pair = read_pair(&mut reader);
            prop_assert_eq!(&pair, expected);
        }
        for _ in 0..probes {
            prop_assert!(!reader.has_next().expect("end"));
        }
        prop_assert_eq!(reader.current_offset(), records.len() as i64);
    }

    /// Interior markers are also valid record boundaries: a densely marked
    /// container reads back exactly like an unmarked one.
    #[test]
    fn prop_sync_blocks_are_transparent(records in arb_records()) {
        let mut reader = open_reader(build_container(&records, Some(1)));

        for expected in &records {
            prop_assert!(reader.has_next().expect("look-ahead"));
            let pair = read_pair(&mut reader);
            prop_assert_eq!(&pair, expected);
        }
        prop_assert!(!reader.has_next().expect("end"));
    }
}

// ============================================================================
// Seek Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// With a marker before every record, seeking to any offset delivers that
    /// exact record next and re-anchors the counter just before it.
    #[test]
    fn prop_seek_lands_on_requested_record(
        (records, target) in arb_records_with_target()
    ) {
        let mut reader = open_reader(build_container(&records, Some(1)));

        reader.seek(target as i64).expect("seek");
        prop_assert_eq!(reader.current_offset(), target as i64 - 1);

        let pair = read_pair(&mut reader);
        prop_assert_eq!(&pair, &records[target]);
        prop_assert_eq!(reader.current_offset(), target as i64);
    }

    /// Seeking to the record count leaves the reader exhausted without
    /// replaying any tail records.
    #[test]
    fn prop_seek_to_count_is_exhausted(records in arb_records()) {
        let mut reader = open_reader(build_container(&records, Some(1)));

        reader.seek(records.len() as i64).expect("seek to count");
        prop_assert!(!reader.has_next().expect("end"));
    }
}
