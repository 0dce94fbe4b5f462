//! Buffered sequential input over a stream source
//!
//! The `ReadBuffer` turns the positional range reads of a [`StreamSource`]
//! into a sequential, seekable byte stream, fetching one chunk of the
//! configured size at a time. Container parsing consumes it through
//! `io::Read`, so the byteorder and vint decoders work on it directly.
//!
//! # Positioning
//!
//! The buffer owns the read cursor. Seeking is free: it either moves inside
//! the already-fetched chunk or drops the chunk and lets the next read fetch
//! from the new position. The source itself stays stateless.

use std::io::{self, Read};

use bytes::Bytes;

use crate::source::StreamSource;

/// Sequential reader over a `StreamSource` with chunked fetching.
#[derive(Debug)]
pub struct ReadBuffer<S: StreamSource> {
    /// The underlying source
    source: S,
    /// Total source size, captured at construction
    total_size: u64,
    /// Chunk size for each source fetch
    buffer_size: usize,
    /// The last fetched chunk
    chunk: Bytes,
    /// Absolute offset of the first byte of `chunk`
    chunk_start: u64,
    /// Read cursor within `chunk`
    chunk_pos: usize,
}

impl<S: StreamSource> ReadBuffer<S> {
    /// Create a buffer over `source`, fetching `buffer_size` bytes per read.
    ///
    /// # Errors
    /// Returns the source's error if the size cannot be determined.
    pub fn new(source: S, buffer_size: usize) -> Result<Self, crate::error::SourceError> {
        let total_size = source.size()?;
        Ok(Self {
            source,
            total_size,
            buffer_size: buffer_size.max(1),
            chunk: Bytes::new(),
            chunk_start: 0,
            chunk_pos: 0,
        })
    }

    /// Absolute position of the next byte to be read.
    pub fn position(&self) -> u64 {
        self.chunk_start + self.chunk_pos as u64
    }

    /// Total size of the underlying source in bytes.
    pub fn size(&self) -> u64 {
        self.total_size
    }

    /// Bytes left between the cursor and the end of the source.
    pub fn remaining(&self) -> u64 {
        self.total_size.saturating_sub(self.position())
    }

    /// Move the cursor to an absolute position.
    ///
    /// Positions inside the fetched chunk are a cursor adjustment; anything
    /// else drops the chunk and defers the fetch to the next read. Seeking
    /// past the end is allowed and reads from there return no bytes.
    pub fn seek(&mut self, pos: u64) {
        let chunk_end = self.chunk_start + self.chunk.len() as u64;
        if pos >= self.chunk_start && pos < chunk_end {
            self.chunk_pos = (pos - self.chunk_start) as usize;
        } else {
            self.chunk = Bytes::new();
            self.chunk_start = pos;
            self.chunk_pos = 0;
        }
    }
}

impl<S: StreamSource> Read for ReadBuffer<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.chunk_pos >= self.chunk.len() {
            let pos = self.position();
            if pos >= self.total_size {
                return Ok(0);
            }

            let chunk = self
                .source
                .read_range(pos, self.buffer_size)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            if chunk.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "source returned no data before its reported end",
                ));
            }

            self.chunk_start = pos;
            self.chunk_pos = 0;
            self.chunk = chunk;
        }

        let available = &self.chunk[self.chunk_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.chunk_pos += n;
        Ok(n)
    }
}
