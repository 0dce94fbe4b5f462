//! Error types for container file reading

use std::io;
use thiserror::Error;

/// Errors that can occur while decoding serialized values
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid serialized data
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// Unexpected end of data
    #[error("Unexpected end of data")]
    UnexpectedEof,
    /// Invalid variable-length integer encoding
    #[error("Invalid vint encoding: {0}")]
    InvalidVint(String),
    /// String is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        // read_exact on a short slice reports UnexpectedEof through io; keep
        // the typed variant so callers can tell truncation from real IO.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::UnexpectedEof
        } else {
            DecodeError::Io(err)
        }
    }
}

/// Errors that can occur with byte sources
#[derive(Debug, Error)]
pub enum SourceError {
    /// File system error
    #[error("File system error: {0}")]
    FileSystemError(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Path not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Top-level reader error type
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Source error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Parse error at specific stream offset
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: u64, message: String },

    /// Decode error in a record
    #[error("Decode error in record {record}: {message}")]
    Decode { record: i64, message: String },

    /// Invalid magic bytes
    #[error("Invalid magic bytes: expected 'SEQ', found {0:?}")]
    InvalidMagic([u8; 3]),

    /// Unsupported container version
    #[error("Unsupported container version: {0}")]
    UnsupportedVersion(u8),

    /// Compressed container payloads are not supported
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Sync marker doesn't match the header's marker
    #[error("Invalid sync marker at offset {offset}")]
    InvalidSyncMarker { offset: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// next() called without a pending record
    #[error("No more records in file: {0}")]
    NoMoreRecords(String),

    /// Operation on a closed reader
    #[error("Reader already closed: {0}")]
    Closed(String),
}
