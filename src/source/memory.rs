//! In-memory source implementation
//!
//! Serves range reads straight out of a `Bytes` buffer. Used by tests and
//! benchmarks, and by embedders that already hold the whole file in memory.

use bytes::Bytes;

use super::traits::StreamSource;
use crate::error::SourceError;

/// A data source backed by an in-memory byte buffer.
///
/// Reads are zero-copy slices of the shared buffer. Cloning the source is
/// cheap and clones share the same bytes.
#[derive(Debug, Clone)]
pub struct BytesSource {
    data: Bytes,
}

impl BytesSource {
    /// Create a source over the given bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// The underlying bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl StreamSource for BytesSource {
    fn read_range(&self, offset: u64, length: usize) -> Result<Bytes, SourceError> {
        let len = self.data.len() as u64;
        if offset >= len {
            return Err(SourceError::FileSystemError(format!(
                "Offset {} is beyond source size {}",
                offset, len
            )));
        }

        let start = offset as usize;
        let end = (start + length).min(self.data.len());
        Ok(self.data.slice(start..end))
    }

    fn size(&self) -> Result<u64, SourceError> {
        Ok(self.data.len() as u64)
    }
}
