//! Shared state for format reader implementations
//!
//! Every format reader carries the same three pieces of bookkeeping: the
//! path it identifies itself by, the record-offset counter the orchestration
//! layer persists, and its scoped view of the connector configuration.
//! `ReaderBase` holds them so concrete readers only implement format logic.

use crate::conf::{RawConfig, ReaderConf};
use crate::error::ReaderError;

/// Path, offset counter, and scoped configuration for a format reader.
#[derive(Debug)]
pub struct ReaderBase {
    path: String,
    offset: i64,
    conf: ReaderConf,
}

impl ReaderBase {
    /// Validate the path and scope the configuration.
    ///
    /// # Errors
    /// `ReaderError::InvalidArgument` when the path is empty.
    pub fn new(path: impl Into<String>, config: &RawConfig) -> Result<Self, ReaderError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ReaderError::InvalidArgument(
                "a file path is required".to_string(),
            ));
        }
        Ok(Self {
            path,
            offset: 0,
            conf: ReaderConf::scoped(config),
        })
    }

    /// The file path this reader identifies itself by.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The record-offset counter persisted for resumability.
    ///
    /// Counts records produced since open; a seek re-anchors it so the next
    /// produced record reports the seek target.
    pub fn current_offset(&self) -> i64 {
        self.offset
    }

    /// Advance the offset counter by one record.
    pub fn increment_offset(&mut self) {
        self.offset += 1;
    }

    /// Reposition the offset counter.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// The reader-scoped configuration.
    pub fn conf(&self) -> &ReaderConf {
        &self.conf
    }
}
