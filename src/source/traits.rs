//! StreamSource trait definition
//!
//! Provides a unified blocking interface for reading bytes from various
//! storage backends.

use bytes::Bytes;

use crate::error::SourceError;

/// Abstraction over byte storage with positional range reads.
///
/// This trait gives readers a single interface over local files, in-memory
/// buffers, and remote stores. Reads are blocking and positional, so a source
/// carries no cursor of its own; the reader layered on top owns all
/// positioning state.
pub trait StreamSource: Send + Sync {
    /// Read bytes from a specific offset with a given length.
    ///
    /// A range extending past the end of the source is clamped; the returned
    /// buffer may be shorter than `length`.
    ///
    /// # Arguments
    /// * `offset` - The byte offset to start reading from
    /// * `length` - The number of bytes to read
    ///
    /// # Errors
    /// Returns `SourceError` if:
    /// - The offset is at or beyond the end of the source
    /// - The source is not accessible
    /// - An I/O error occurs
    fn read_range(&self, offset: u64, length: usize) -> Result<Bytes, SourceError>;

    /// Get the total size of the data source in bytes.
    fn size(&self) -> Result<u64, SourceError>;
}

/// A boxed StreamSource for dynamic dispatch
pub type BoxedSource = Box<dyn StreamSource>;

/// Implement StreamSource for BoxedSource to allow using it with generic code
impl StreamSource for BoxedSource {
    fn read_range(&self, offset: u64, length: usize) -> Result<Bytes, SourceError> {
        (**self).read_range(offset, length)
    }

    fn size(&self) -> Result<u64, SourceError> {
        (**self).size()
    }
}
