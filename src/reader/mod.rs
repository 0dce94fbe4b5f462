//! File readers for container formats
//!
//! This module holds the reader contract and everything the sequence
//! container implementation is made of: the shared reader state, the
//! buffered source cursor, the header and vint codecs, the native value
//! holders, and the record adapter.
//!
//! Readers follow a strict look-ahead protocol: `has_next` decodes one
//! record ahead and caches it, `next` consumes the cached record. `next`
//! without a successful `has_next` is a protocol error; running off the end
//! of the file is not. [`Records`] drives the protocol as an iterator.

mod adapter;
pub mod base;
pub mod buffer;
pub mod header;
pub mod sequence;
pub mod vint;
pub mod writable;

pub use base::ReaderBase;
pub use buffer::ReadBuffer;
pub use header::{SequenceHeader, CONTAINER_VERSION, SEQ_MAGIC, SYNC_MARKER_SIZE};
pub use sequence::{
    SequenceFileReader, BUFFER_SIZE_CONF, DEFAULT_BUFFER_SIZE, DEFAULT_FIELD_NAME_KEY,
    DEFAULT_FIELD_NAME_VALUE, FIELD_NAME_KEY_CONF, FIELD_NAME_VALUE_CONF,
};
pub use writable::{Writable, WritableKind};

use crate::data::StructRecord;
use crate::error::ReaderError;

/// The contract every format reader implements.
///
/// Offsets are zero-based record ordinals within one file; the offset
/// counter is what an orchestration layer persists to resume a file later.
pub trait FileReader: Send {
    /// Whether another record is pending.
    ///
    /// The first call after a consume decodes one record ahead and caches
    /// the outcome; repeated calls return the cached answer without touching
    /// the stream or the offset counter. End of file is `Ok(false)`, never
    /// an error.
    ///
    /// # Errors
    /// `ReaderError::Closed` after [`close`](FileReader::close); parse,
    /// decode, and source errors from the look-ahead.
    fn has_next(&mut self) -> Result<bool, ReaderError>;

    /// Consume and return the pending record.
    ///
    /// # Errors
    /// `ReaderError::NoMoreRecords` unless a preceding
    /// [`has_next`](FileReader::has_next) returned `true`;
    /// `ReaderError::Closed` after close.
    fn next(&mut self) -> Result<StructRecord, ReaderError>;

    /// Reposition so the next record produced reports offset `offset`.
    ///
    /// The stream lands on the nearest synchronization point at or before
    /// that record, so with sparse markers the produced *content* can come
    /// from an earlier record; callers that need the exact record skip
    /// forward from there. Seeking at or past the end of the file leaves the
    /// reader exhausted rather than replaying the tail.
    ///
    /// # Errors
    /// `ReaderError::InvalidArgument` for a negative offset;
    /// `ReaderError::Closed` after close; parse and source errors from the
    /// marker scan.
    fn seek(&mut self, offset: i64) -> Result<(), ReaderError>;

    /// The record-offset counter persisted for resumability.
    ///
    /// Counts records produced since open; after a seek, the next produced
    /// record reports the seek target. Valid after close.
    fn current_offset(&self) -> i64;

    /// The file path this reader identifies itself by. Valid after close.
    fn path(&self) -> &str;

    /// Release the underlying stream. Idempotent.
    ///
    /// After closing, every operation except
    /// [`current_offset`](FileReader::current_offset) and
    /// [`path`](FileReader::path) fails with `ReaderError::Closed`.
    fn close(&mut self) -> Result<(), ReaderError>;

    /// Iterate over the remaining records, driving the look-ahead protocol.
    ///
    /// The iterator yields `Err` once on failure and then fuses.
    fn records(&mut self) -> Records<'_, Self>
    where
        Self: Sized,
    {
        Records {
            reader: self,
            done: false,
        }
    }
}

/// A dynamically dispatched file reader.
pub type BoxedReader = Box<dyn FileReader>;

impl FileReader for BoxedReader {
    fn has_next(&mut self) -> Result<bool, ReaderError> {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<StructRecord, ReaderError> {
        (**self).next()
    }

    fn seek(&mut self, offset: i64) -> Result<(), ReaderError> {
        (**self).seek(offset)
    }

    fn current_offset(&self) -> i64 {
        (**self).current_offset()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn close(&mut self) -> Result<(), ReaderError> {
        (**self).close()
    }
}

/// Iterator over the remaining records of a reader.
///
/// Created by [`FileReader::records`]. Each step runs one
/// `has_next`/`next` cycle; the first error is yielded and the iterator
/// fuses.
pub struct Records<'a, R: FileReader> {
    reader: &'a mut R,
    done: bool,
}

impl<R: FileReader> Iterator for Records<'_, R> {
    type Item = Result<StructRecord, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.has_next() {
            Ok(true) => {
                let record = self.reader.next();
                if record.is_err() {
                    self.done = true;
                }
                Some(record)
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
