//! Sequence container header parsing
//!
//! Parses the header that opens every sequence container file:
//! - Magic bytes (`SEQ`) and a version byte
//! - Key and value class names
//! - Compression flags (and codec class name when set)
//! - Metadata string pairs
//! - 16-byte sync marker delimiting the first record boundary

use std::collections::HashMap;
use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{DecodeError, ReaderError};

use super::writable::read_text;

/// The magic bytes that identify a sequence container file.
pub const SEQ_MAGIC: [u8; 3] = *b"SEQ";

/// The container version this reader understands (the metadata-bearing
/// layout all current writers emit).
pub const CONTAINER_VERSION: u8 = 6;

/// Size of the synchronization marker, in bytes.
pub const SYNC_MARKER_SIZE: usize = 16;

/// Parsed sequence container header.
///
/// The header fixes everything the reader needs for the rest of the file:
/// the native key/value types, whether payloads are compressed, and the sync
/// marker that delimits record-boundary escapes in the stream.
#[derive(Debug, Clone)]
pub struct SequenceHeader {
    /// Container version byte.
    pub version: u8,
    /// Native class name of every key in the file.
    pub key_class: String,
    /// Native class name of every value in the file.
    pub value_class: String,
    /// Whether record payloads are compressed.
    pub compressed: bool,
    /// Whether records are grouped into compressed blocks.
    pub block_compressed: bool,
    /// Codec class name, present when `compressed` is set.
    pub compression_codec: Option<String>,
    /// Metadata key-value pairs from the header.
    pub metadata: HashMap<String, String>,
    /// 16-byte sync marker used to verify record-boundary escapes.
    pub sync_marker: [u8; SYNC_MARKER_SIZE],
    /// Total size of the header in bytes (offset where records begin).
    pub header_size: u64,
}

impl SequenceHeader {
    /// Parse a header from the start of a container stream.
    ///
    /// The reader is left positioned on the first record boundary.
    ///
    /// # Errors
    /// - `ReaderError::InvalidMagic` if the magic bytes don't match
    /// - `ReaderError::UnsupportedVersion` for any version but the current one
    /// - `ReaderError::Parse` if a field cannot be read
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ReaderError> {
        let mut r = CountingReader::new(reader);

        // Magic and version share the first four bytes
        let mut magic_block = [0u8; 4];
        r.read_exact(&mut magic_block)
            .map_err(|e| parse_error(r.consumed, e.into()))?;
        let magic = [magic_block[0], magic_block[1], magic_block[2]];
        if magic != SEQ_MAGIC {
            return Err(ReaderError::InvalidMagic(magic));
        }
        let version = magic_block[3];
        if version != CONTAINER_VERSION {
            return Err(ReaderError::UnsupportedVersion(version));
        }

        let key_class = read_text(&mut r).map_err(|e| parse_error(r.consumed, e))?;
        let value_class = read_text(&mut r).map_err(|e| parse_error(r.consumed, e))?;

        let mut flags = [0u8; 2];
        r.read_exact(&mut flags)
            .map_err(|e| parse_error(r.consumed, e.into()))?;
        let compressed = flags[0] != 0;
        let block_compressed = flags[1] != 0;

        // The codec class name is only present when payloads are compressed
        let compression_codec = if compressed {
            Some(read_text(&mut r).map_err(|e| parse_error(r.consumed, e))?)
        } else {
            None
        };

        let pair_count = r
            .read_i32::<BigEndian>()
            .map_err(|e| parse_error(r.consumed, e.into()))?;
        if pair_count < 0 {
            return Err(ReaderError::Parse {
                offset: r.consumed,
                message: format!("negative metadata pair count {}", pair_count),
            });
        }
        let mut metadata = HashMap::new();
        for _ in 0..pair_count {
            let key = read_text(&mut r).map_err(|e| parse_error(r.consumed, e))?;
            let value = read_text(&mut r).map_err(|e| parse_error(r.consumed, e))?;
            metadata.insert(key, value);
        }

        let mut sync_marker = [0u8; SYNC_MARKER_SIZE];
        r.read_exact(&mut sync_marker)
            .map_err(|e| parse_error(r.consumed, e.into()))?;

        let header_size = r.consumed;
        Ok(Self {
            version,
            key_class,
            value_class,
            compressed,
            block_compressed,
            compression_codec,
            metadata,
            sync_marker,
            header_size,
        })
    }
}

fn parse_error(offset: u64, err: DecodeError) -> ReaderError {
    ReaderError::Parse {
        offset,
        message: err.to_string(),
    }
}

/// `Read` wrapper counting consumed bytes, so parse errors and the header
/// size carry real stream offsets.
struct CountingReader<'a, R: Read> {
    inner: &'a mut R,
    consumed: u64,
}

impl<'a, R: Read> CountingReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, consumed: 0 }
    }
}

impl<R: Read> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}
