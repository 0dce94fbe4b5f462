//! Local filesystem source implementation
//!
//! Provides blocking file I/O for reading container files from the local
//! filesystem.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::Mutex;

use super::traits::StreamSource;
use crate::error::SourceError;

/// A data source for reading from the local filesystem.
///
/// Range reads are served by seek + read on a single file handle. The handle
/// sits behind a mutex because seeking mutates the handle's position even
/// though the trait takes `&self`. Dropping the source closes the file.
pub struct LocalSource {
    /// The file handle, guarded so seek/read stay paired
    file: Mutex<File>,
    /// Path to the file (for error reporting)
    path: PathBuf,
    /// Cached file size
    file_size: u64,
}

impl LocalSource {
    /// Open a local file for reading.
    ///
    /// # Arguments
    /// * `path` - Path to the file to open
    ///
    /// # Errors
    /// Returns `SourceError::NotFound` if the file doesn't exist.
    /// Returns `SourceError::PermissionDenied` if access is denied.
    /// Returns `SourceError::FileSystemError` for other I/O errors.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(path.display().to_string())
            } else if e.kind() == std::io::ErrorKind::PermissionDenied {
                SourceError::PermissionDenied(path.display().to_string())
            } else {
                SourceError::FileSystemError(format!("{}: {}", path.display(), e))
            }
        })?;

        let metadata = file.metadata().map_err(|e| {
            SourceError::FileSystemError(format!(
                "Failed to get metadata for {}: {}",
                path.display(),
                e
            ))
        })?;

        let file_size = metadata.len();

        Ok(Self {
            file: Mutex::new(file),
            path,
            file_size,
        })
    }

    /// Get the path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StreamSource for LocalSource {
    fn read_range(&self, offset: u64, length: usize) -> Result<Bytes, SourceError> {
        if offset >= self.file_size {
            return Err(SourceError::FileSystemError(format!(
                "Offset {} is beyond file size {} for {}",
                offset,
                self.file_size,
                self.path.display()
            )));
        }

        // Clamp length to not exceed file bounds
        let available = (self.file_size - offset) as usize;
        let actual_length = length.min(available);

        let mut file = self.file.lock();

        file.seek(SeekFrom::Start(offset)).map_err(|e| {
            SourceError::FileSystemError(format!(
                "Failed to seek to offset {} in {}: {}",
                offset,
                self.path.display(),
                e
            ))
        })?;

        let mut buffer = vec![0u8; actual_length];
        file.read_exact(&mut buffer).map_err(|e| {
            SourceError::FileSystemError(format!(
                "Failed to read {} bytes at offset {} from {}: {}",
                actual_length,
                offset,
                self.path.display(),
                e
            ))
        })?;

        Ok(Bytes::from(buffer))
    }

    fn size(&self) -> Result<u64, SourceError> {
        Ok(self.file_size)
    }
}

impl std::fmt::Debug for LocalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSource")
            .field("path", &self.path)
            .field("file_size", &self.file_size)
            .finish()
    }
}
