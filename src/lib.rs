//! Streaming reader for binary sequence container files
//!
//! This library reads the typed key/value container format used by
//! distributed filesystem pipelines into generic structured records,
//! supporting pluggable byte sources and record-offset resumption.
//!
//! Open a [`SequenceFileReader`] over a [`StreamSource`], then drive the
//! [`FileReader`] look-ahead protocol or iterate with
//! [`FileReader::records`]:
//!
//! ```ignore
//! use recliner::{FileReader, LocalSource, RawConfig, SequenceFileReader};
//!
//! let source = LocalSource::open("/data/events.seq")?;
//! let mut reader = SequenceFileReader::open(source, "/data/events.seq", &RawConfig::new())?;
//! while reader.has_next()? {
//!     let record = reader.next()?;
//!     println!("{:?} at offset {}", record.values(), reader.current_offset());
//! }
//! reader.close()?;
//! ```

pub mod conf;
pub mod data;
pub mod error;
pub mod reader;
pub mod source;

// Re-export main types
pub use conf::{RawConfig, ReaderConf, FILE_READER_PREFIX};
pub use data::{Field, Schema, SchemaBuilder, SchemaType, StructRecord, Value};
pub use error::{DecodeError, ReaderError, SourceError};
pub use reader::{
    BoxedReader, FileReader, ReadBuffer, ReaderBase, Records, SequenceFileReader, SequenceHeader,
    Writable, WritableKind,
};
pub use source::{BoxedSource, BytesSource, LocalSource, StreamSource};
