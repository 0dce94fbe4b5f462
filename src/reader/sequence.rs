//! Reader for the binary sequence container format
//!
//! A sequence container stores typed key/value records behind a
//! self-describing header: magic and version, the key and value class names,
//! compression flags, user metadata, and a 16-byte synchronization marker
//! that reappears between records so a stream can be re-entered mid-file.
//!
//! `SequenceFileReader` decodes uncompressed version-6 containers into
//! [`StructRecord`]s with one field per half of the pair. Callers drive the
//! strict look-ahead protocol of [`FileReader`](super::FileReader):
//! `has_next` decodes one record ahead into reused holders, `next` consumes
//! the cached pair through the struct adapter. Seeking repositions the
//! stream at the nearest synchronization point at or before the requested
//! record, so with sparse markers the content replays from that marker while
//! the offset counter reports the requested record.

use std::io::{self, Read};
use std::sync::Arc;

use byteorder::{BigEndian, ReadBytesExt};
use tracing::{debug, warn};

use crate::conf::RawConfig;
use crate::data::{Schema, StructRecord};
use crate::error::ReaderError;
use crate::source::StreamSource;

use super::adapter::StructAdapter;
use super::base::ReaderBase;
use super::buffer::ReadBuffer;
use super::header::{SequenceHeader, SYNC_MARKER_SIZE};
use super::writable::{Writable, WritableKind};
use super::FileReader;

/// Configuration key for the chunk size of source fetches, in bytes.
pub const BUFFER_SIZE_CONF: &str = "file.reader.sequence.buffer_size";
/// Configuration key for the schema name of the key field.
pub const FIELD_NAME_KEY_CONF: &str = "file.reader.sequence.field_name.key";
/// Configuration key for the schema name of the value field.
pub const FIELD_NAME_VALUE_CONF: &str = "file.reader.sequence.field_name.value";

/// Fetch size used when [`BUFFER_SIZE_CONF`] is absent.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;
/// Key field name used when [`FIELD_NAME_KEY_CONF`] is absent.
pub const DEFAULT_FIELD_NAME_KEY: &str = "key";
/// Value field name used when [`FIELD_NAME_VALUE_CONF`] is absent.
pub const DEFAULT_FIELD_NAME_VALUE: &str = "value";

/// Record-length sentinel that introduces an inline sync block instead.
const SYNC_ESCAPE: i32 = -1;

/// Reader for uncompressed sequence containers.
///
/// Created by [`open`](SequenceFileReader::open), which parses the header,
/// resolves the key and value classes, and fixes the two-field output
/// schema. The protocol methods live on the [`FileReader`] impl.
#[derive(Debug)]
pub struct SequenceFileReader<S: StreamSource> {
    base: ReaderBase,
    /// Buffered input; `None` once the reader is closed.
    input: Option<ReadBuffer<S>>,
    header: SequenceHeader,
    /// Absolute offset of the first byte after the header.
    data_start: u64,
    key: Writable,
    value: Writable,
    adapter: StructAdapter,
    /// Reused backing for one record's key and value slots.
    record_buf: Vec<u8>,
    /// Index of the last record consumed by `next`.
    record_index: i64,
    /// Index of the last record decoded by the look-ahead.
    lookahead_index: i64,
    /// Whether the decoded look-ahead record is still unconsumed.
    has_next: bool,
}

impl<S: StreamSource> SequenceFileReader<S> {
    /// Open a sequence container over `source`.
    ///
    /// Parses the header, rejects compressed containers, resolves the key
    /// and value classes (unrecognized classes fall back to opaque string
    /// rendering), and builds the output schema with the configured field
    /// names.
    ///
    /// # Arguments
    /// * `source` - The byte source holding the container
    /// * `path` - The path this reader identifies itself by
    /// * `config` - Full connector configuration; only reader-scoped entries
    ///   apply
    ///
    /// # Errors
    /// `InvalidArgument` for an empty path; `Configuration` for a malformed
    /// `buffer_size` or colliding field names; header errors per
    /// [`SequenceHeader::read_from`]; `UnsupportedCompression` when either
    /// compression flag is set.
    pub fn open(source: S, path: impl Into<String>, config: &RawConfig) -> Result<Self, ReaderError> {
        let base = ReaderBase::new(path, config)?;
        let conf = base.conf();

        let buffer_size = match conf.get(BUFFER_SIZE_CONF) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    ReaderError::Configuration(format!(
                        "{} must be a positive integer, got '{}'",
                        BUFFER_SIZE_CONF, raw
                    ))
                })?,
            None => DEFAULT_BUFFER_SIZE,
        };

        let key_field = conf
            .get_or(FIELD_NAME_KEY_CONF, DEFAULT_FIELD_NAME_KEY)
            .to_string();
        let value_field = conf
            .get_or(FIELD_NAME_VALUE_CONF, DEFAULT_FIELD_NAME_VALUE)
            .to_string();
        if key_field == value_field {
            return Err(ReaderError::Configuration(format!(
                "key and value field names must differ, both are '{}'",
                key_field
            )));
        }

        let mut input = ReadBuffer::new(source, buffer_size)?;
        let header = SequenceHeader::read_from(&mut input)?;

        if header.compressed || header.block_compressed {
            let codec = header
                .compression_codec
                .as_deref()
                .unwrap_or("block compression without a named codec")
                .to_string();
            return Err(ReaderError::UnsupportedCompression(codec));
        }

        let data_start = input.position();

        let key_kind = WritableKind::from_class(&header.key_class);
        if key_kind == WritableKind::Opaque {
            warn!(
                path = %base.path(),
                class = %header.key_class,
                "Unrecognized key class, rendering as text"
            );
        }
        let value_kind = WritableKind::from_class(&header.value_class);
        if value_kind == WritableKind::Opaque {
            warn!(
                path = %base.path(),
                class = %header.value_class,
                "Unrecognized value class, rendering as text"
            );
        }

        let schema = Arc::new(
            Schema::builder()
                .field(key_field, key_kind.schema_type())
                .field(value_field, value_kind.schema_type())
                .build(),
        );

        debug!(
            path = %base.path(),
            key_class = %header.key_class,
            value_class = %header.value_class,
            key_type = key_kind.schema_type().name(),
            value_type = value_kind.schema_type().name(),
            data_start,
            size = input.size(),
            "Opened sequence container"
        );

        Ok(Self {
            base,
            input: Some(input),
            header,
            data_start,
            key: Writable::empty(key_kind),
            value: Writable::empty(value_kind),
            adapter: StructAdapter::new(schema),
            record_buf: Vec::new(),
            record_index: -1,
            lookahead_index: -1,
            has_next: false,
        })
    }

    /// The parsed container header: class names, metadata, sync marker.
    pub fn header(&self) -> &SequenceHeader {
        &self.header
    }

    /// The two-field output schema.
    pub fn schema(&self) -> &Arc<Schema> {
        self.adapter.schema()
    }

    /// Decode the next entry from the cursor into the holders.
    ///
    /// Verifies and skips inline sync blocks. `Ok(false)` means the clean
    /// end of the stream; truncation mid-entry is a parse error.
    fn decode_entry(
        input: &mut ReadBuffer<S>,
        header: &SequenceHeader,
        key: &mut Writable,
        value: &mut Writable,
        record_buf: &mut Vec<u8>,
        record: i64,
    ) -> Result<bool, ReaderError> {
        loop {
            if input.remaining() == 0 {
                return Ok(false);
            }

            let entry_start = input.position();
            let length = input
                .read_i32::<BigEndian>()
                .map_err(|e| parse_io(entry_start, e))?;

            if length == SYNC_ESCAPE {
                let mut marker = [0u8; SYNC_MARKER_SIZE];
                input
                    .read_exact(&mut marker)
                    .map_err(|e| parse_io(entry_start, e))?;
                if marker != header.sync_marker {
                    return Err(ReaderError::InvalidSyncMarker { offset: entry_start });
                }
                continue;
            }

            if length < 0 {
                return Err(ReaderError::Parse {
                    offset: entry_start,
                    message: format!("negative record length {}", length),
                });
            }
            let key_length = input
                .read_i32::<BigEndian>()
                .map_err(|e| parse_io(entry_start, e))?;
            if key_length < 0 || key_length > length {
                return Err(ReaderError::Parse {
                    offset: entry_start,
                    message: format!(
                        "key length {} outside record length {}",
                        key_length, length
                    ),
                });
            }
            let remaining = input.remaining();
            if length as u64 > remaining {
                return Err(ReaderError::Parse {
                    offset: entry_start,
                    message: format!(
                        "record length {} exceeds {} remaining bytes",
                        length, remaining
                    ),
                });
            }

            let length = length as usize;
            let key_length = key_length as usize;
            record_buf.resize(length, 0);
            input
                .read_exact(record_buf)
                .map_err(|e| parse_io(entry_start, e))?;

            key.read_from(&record_buf[..key_length])
                .map_err(|e| decode_slot(record, "key", e))?;
            value
                .read_from(&record_buf[key_length..])
                .map_err(|e| decode_slot(record, "value", e))?;

            return Ok(true);
        }
    }

    /// Walk entries from the start of the data section until `target`
    /// records have passed, leaving the cursor on the last verified sync
    /// point at or before the record entry that follows them. Returns the
    /// stream position the cursor was left at.
    ///
    /// Reaching the end of the stream parks the cursor there: the end of
    /// data is the strongest sync point, and a resume at the record count
    /// of a finished file must not replay its tail.
    fn scan_to(
        input: &mut ReadBuffer<S>,
        header: &SequenceHeader,
        data_start: u64,
        target: i64,
    ) -> Result<u64, ReaderError> {
        input.seek(data_start);
        let mut sync_pos = data_start;
        let mut records: i64 = 0;

        loop {
            if input.remaining() == 0 {
                return Ok(input.position());
            }

            let entry_start = input.position();
            let length = input
                .read_i32::<BigEndian>()
                .map_err(|e| parse_io(entry_start, e))?;

            if length == SYNC_ESCAPE {
                let mut marker = [0u8; SYNC_MARKER_SIZE];
                input
                    .read_exact(&mut marker)
                    .map_err(|e| parse_io(entry_start, e))?;
                if marker != header.sync_marker {
                    return Err(ReaderError::InvalidSyncMarker { offset: entry_start });
                }
                sync_pos = input.position();
                continue;
            }

            if length < 0 {
                return Err(ReaderError::Parse {
                    offset: entry_start,
                    message: format!("negative record length {}", length),
                });
            }

            if records == target {
                input.seek(sync_pos);
                return Ok(sync_pos);
            }

            let key_length = input
                .read_i32::<BigEndian>()
                .map_err(|e| parse_io(entry_start, e))?;
            if key_length < 0 || key_length > length {
                return Err(ReaderError::Parse {
                    offset: entry_start,
                    message: format!(
                        "key length {} outside record length {}",
                        key_length, length
                    ),
                });
            }
            let remaining = input.remaining();
            if length as u64 > remaining {
                return Err(ReaderError::Parse {
                    offset: entry_start,
                    message: format!(
                        "record length {} exceeds {} remaining bytes",
                        length, remaining
                    ),
                });
            }

            let skip_to = input.position() + length as u64;
            input.seek(skip_to);
            records += 1;
        }
    }
}

impl<S: StreamSource> FileReader for SequenceFileReader<S> {
    fn has_next(&mut self) -> Result<bool, ReaderError> {
        let input = match self.input.as_mut() {
            Some(input) => input,
            None => return Err(ReaderError::Closed(self.base.path().to_string())),
        };

        if self.lookahead_index == self.record_index {
            // Clear first so a failed decode leaves no phantom record cached.
            self.has_next = false;
            self.lookahead_index += 1;
            self.has_next = Self::decode_entry(
                input,
                &self.header,
                &mut self.key,
                &mut self.value,
                &mut self.record_buf,
                self.lookahead_index,
            )?;
        }
        Ok(self.has_next)
    }

    fn next(&mut self) -> Result<StructRecord, ReaderError> {
        if self.input.is_none() {
            return Err(ReaderError::Closed(self.base.path().to_string()));
        }
        if !self.has_next {
            return Err(ReaderError::NoMoreRecords(self.base.path().to_string()));
        }

        self.record_index += 1;
        self.has_next = false;
        self.base.increment_offset();
        Ok(self.adapter.adapt(&self.key, &self.value))
    }

    fn seek(&mut self, target: i64) -> Result<(), ReaderError> {
        let input = match self.input.as_mut() {
            Some(input) => input,
            None => return Err(ReaderError::Closed(self.base.path().to_string())),
        };
        if target < 0 {
            return Err(ReaderError::InvalidArgument(format!(
                "record offset must not be negative, got {}",
                target
            )));
        }

        let resumed_at = Self::scan_to(input, &self.header, self.data_start, target)?;

        self.record_index = target;
        self.lookahead_index = target;
        self.has_next = false;
        self.base.set_offset(target - 1);

        debug!(
            path = %self.base.path(),
            target,
            resumed_at,
            "Sought to record offset"
        );
        Ok(())
    }

    fn current_offset(&self) -> i64 {
        self.base.current_offset()
    }

    fn path(&self) -> &str {
        self.base.path()
    }

    fn close(&mut self) -> Result<(), ReaderError> {
        if self.input.take().is_some() {
            debug!(path = %self.base.path(), "Closed sequence container");
        }
        self.has_next = false;
        Ok(())
    }
}

fn parse_io(offset: u64, err: io::Error) -> ReaderError {
    let message = if err.kind() == io::ErrorKind::UnexpectedEof {
        "unexpected end of stream".to_string()
    } else {
        err.to_string()
    };
    ReaderError::Parse { offset, message }
}

fn decode_slot(record: i64, slot: &str, err: crate::error::DecodeError) -> ReaderError {
    ReaderError::Decode {
        record,
        message: format!("{}: {}", slot, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SchemaType, Value};
    use crate::reader::header::{CONTAINER_VERSION, SEQ_MAGIC};
    use crate::reader::vint;
    use crate::source::BytesSource;

    const TEST_SYNC: [u8; SYNC_MARKER_SIZE] = [0xA5; SYNC_MARKER_SIZE];

    fn push_text(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&vint::encode_vint(s.len() as i32));
        buf.extend_from_slice(s.as_bytes());
    }

    fn header_bytes(key_class: &str, value_class: &str, compressed: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&SEQ_MAGIC);
        buf.push(CONTAINER_VERSION);
        push_text(&mut buf, key_class);
        push_text(&mut buf, value_class);
        buf.push(compressed as u8);
        buf.push(0);
        if compressed {
            push_text(&mut buf, "org.apache.hadoop.io.compress.DefaultCodec");
        }
        buf.extend_from_slice(&0i32.to_be_bytes());
        buf.extend_from_slice(&TEST_SYNC);
        buf
    }

    fn int_text_container(records: &[(i32, &str)]) -> Vec<u8> {
        let mut buf = header_bytes(
            "org.apache.hadoop.io.IntWritable",
            "org.apache.hadoop.io.Text",
            false,
        );
        for (key, value) in records {
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

    fn open_fixture(
        data: Vec<u8>,
        config: &RawConfig,
    ) -> Result<SequenceFileReader<BytesSource>, ReaderError> {
        SequenceFileReader::open(BytesSource::new(data), "/data/fixture.seq", config)
    }

    fn conf(pairs: &[(&str, &str)]) -> RawConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn test_open_reads_header_and_schema() {
        let reader = open_fixture(int_text_container(&[]), &RawConfig::new()).unwrap();

        assert_eq!(reader.header().key_class, "org.apache.hadoop.io.IntWritable");
        assert_eq!(reader.header().value_class, "org.apache.hadoop.io.Text");
        assert_eq!(reader.header().sync_marker, TEST_SYNC);

        let schema = reader.schema();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.fields()[0].name(), "key");
        assert_eq!(schema.fields()[0].schema_type(), SchemaType::Int32);
        assert_eq!(schema.fields()[1].name(), "value");
        assert_eq!(schema.fields()[1].schema_type(), SchemaType::String);

        assert_eq!(reader.path(), "/data/fixture.seq");
        assert_eq!(reader.current_offset(), 0);
    }

    #[test]
    fn test_open_with_configured_field_names() {
        let config = conf(&[
            (FIELD_NAME_KEY_CONF, "id"),
            (FIELD_NAME_VALUE_CONF, "payload"),
        ]);
        let reader = open_fixture(int_text_container(&[]), &config).unwrap();

        let schema = reader.schema();
        assert_eq!(schema.fields()[0].name(), "id");
        assert_eq!(schema.fields()[1].name(), "payload");
    }

    #[test]
    fn test_open_rejects_equal_field_names() {
        let config = conf(&[
            (FIELD_NAME_KEY_CONF, "same"),
            (FIELD_NAME_VALUE_CONF, "same"),
        ]);
        let err = open_fixture(int_text_container(&[]), &config).unwrap_err();
        assert!(matches!(err, ReaderError::Configuration(_)));
    }

    #[test]
    fn test_open_rejects_bad_buffer_size() {
        for bad in ["abc", "0", "-16", "4.5"] {
            let config = conf(&[(BUFFER_SIZE_CONF, bad)]);
            let err = open_fixture(int_text_container(&[]), &config).unwrap_err();
            assert!(matches!(err, ReaderError::Configuration(_)), "{}", bad);
        }
    }

    #[test]
    fn test_open_rejects_compressed_container() {
        let data = header_bytes(
            "org.apache.hadoop.io.IntWritable",
            "org.apache.hadoop.io.Text",
            true,
        );
        let err = open_fixture(data, &RawConfig::new()).unwrap_err();
        match err {
            ReaderError::UnsupportedCompression(codec) => {
                assert!(codec.contains("DefaultCodec"));
            }
            other => panic!("expected UnsupportedCompression, got {:?}", other),
        }
    }

    #[test]
    fn test_open_rejects_empty_path() {
        let err = SequenceFileReader::open(
            BytesSource::new(int_text_container(&[])),
            "",
            &RawConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ReaderError::InvalidArgument(_)));
    }

    #[test]
    fn test_unrecognized_classes_fall_back_to_string() {
        let mut data = header_bytes("com.example.TraceId", "com.example.Span", false);
        // One record: opaque slots are taken verbatim
        data.extend_from_slice(&8i32.to_be_bytes());
        data.extend_from_slice(&3i32.to_be_bytes());
        data.extend_from_slice(b"abcHELLO");

        let mut reader = open_fixture(data, &RawConfig::new()).unwrap();
        let schema = reader.schema();
        assert_eq!(schema.fields()[0].schema_type(), SchemaType::String);
        assert_eq!(schema.fields()[1].schema_type(), SchemaType::String);

        assert!(reader.has_next().unwrap());
        let record = reader.next().unwrap();
        assert_eq!(record.get("key"), Some(&Value::String("abc".to_string())));
        assert_eq!(
            record.get("value"),
            Some(&Value::String("HELLO".to_string()))
        );
    }

    #[test]
    fn test_empty_container_has_no_records() {
        let mut reader = open_fixture(int_text_container(&[]), &RawConfig::new()).unwrap();

        assert!(!reader.has_next().unwrap());
        assert!(!reader.has_next().unwrap());
        assert!(matches!(
            reader.next().unwrap_err(),
            ReaderError::NoMoreRecords(_)
        ));
    }

    #[test]
    fn test_read_single_record() {
        let data = int_text_container(&[(42, "answer")]);
        let mut reader = open_fixture(data, &RawConfig::new()).unwrap();

        assert!(reader.has_next().unwrap());
        let record = reader.next().unwrap();
        assert_eq!(record.get("key"), Some(&Value::Int32(42)));
        assert_eq!(
            record.get("value"),
            Some(&Value::String("answer".to_string()))
        );
        assert_eq!(reader.current_offset(), 1);

        assert!(!reader.has_next().unwrap());
        assert!(matches!(
            reader.next().unwrap_err(),
            ReaderError::NoMoreRecords(_)
        ));
    }

    #[test]
    fn test_next_without_lookahead_fails() {
        let data = int_text_container(&[(1, "a")]);
        let mut reader = open_fixture(data, &RawConfig::new()).unwrap();

        let err = reader.next().unwrap_err();
        assert!(matches!(err, ReaderError::NoMoreRecords(_)));

        // The record is still there once the protocol is followed
        assert!(reader.has_next().unwrap());
        assert_eq!(
            reader.next().unwrap().get("key"),
            Some(&Value::Int32(1))
        );
    }

    #[test]
    fn test_close_is_idempotent_and_blocks_operations() {
        let data = int_text_container(&[(1, "a")]);
        let mut reader = open_fixture(data, &RawConfig::new()).unwrap();

        reader.close().unwrap();
        reader.close().unwrap();

        assert!(matches!(
            reader.has_next().unwrap_err(),
            ReaderError::Closed(_)
        ));
        assert!(matches!(reader.next().unwrap_err(), ReaderError::Closed(_)));
        assert!(matches!(
            reader.seek(0).unwrap_err(),
            ReaderError::Closed(_)
        ));

        // Identity accessors survive the close
        assert_eq!(reader.path(), "/data/fixture.seq");
        assert_eq!(reader.current_offset(), 0);
    }
}
