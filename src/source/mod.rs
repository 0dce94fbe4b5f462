//! Data source abstractions for reading container files
//!
//! This module provides a unified blocking interface for reading bytes from
//! different storage backends (local filesystem, in-memory buffers) with
//! positional range reads.

mod local;
mod memory;
mod traits;

pub use local::LocalSource;
pub use memory::BytesSource;
pub use traits::{BoxedSource, StreamSource};
