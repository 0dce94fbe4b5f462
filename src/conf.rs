//! Reader configuration scoping
//!
//! The orchestration layer hands every reader the full connector
//! configuration as a flat string map. Readers only ever see the subset of
//! entries under the reader namespace; everything else (connector identity,
//! policy settings, downstream options) is dropped before the reader is
//! constructed.

use std::collections::HashMap;

/// Flat connector configuration as handed to a reader.
///
/// A `None` value means the entry is explicitly unset and is treated as
/// absent.
pub type RawConfig = HashMap<String, Option<String>>;

/// Namespace prefix for all reader configuration keys.
pub const FILE_READER_PREFIX: &str = "file.reader.";

/// The reader-scoped view of a [`RawConfig`].
///
/// Holds only entries whose key starts with [`FILE_READER_PREFIX`] and whose
/// value is set. Lookup is by full key; readers parse their own values.
#[derive(Debug, Clone, Default)]
pub struct ReaderConf {
    entries: HashMap<String, String>,
}

impl ReaderConf {
    /// Builds the scoped view of `config`, keeping only set entries under the
    /// reader namespace.
    pub fn scoped(config: &RawConfig) -> Self {
        let entries = config
            .iter()
            .filter(|(key, _)| key.starts_with(FILE_READER_PREFIX))
            .filter_map(|(key, value)| {
                value.as_ref().map(|v| (key.clone(), v.clone()))
            })
            .collect();
        Self { entries }
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Number of scoped entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry survived scoping.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
