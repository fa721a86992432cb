//! Archive assembly from located source files.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;

use super::{layout, Archive};
use crate::error::{ArchiveError, ArchiveResult};
use crate::wav::PayloadLocation;

/// Collects located source files and assembles them into an [`Archive`].
///
/// Sources are packed in the order they were pushed.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    sources: Vec<(PathBuf, PayloadLocation)>,
}

impl ArchiveBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with room for `capacity` sources.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sources: Vec::with_capacity(capacity),
        }
    }

    /// Appends a source file whose payload lives at `location`.
    pub fn push(&mut self, path: impl Into<PathBuf>, location: PayloadLocation) -> &mut Self {
        self.sources.push((path.into(), location));
        self
    }

    /// Number of queued sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources are queued.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Reads every payload and assembles the archive.
    pub fn build(self) -> ArchiveResult<Archive> {
        self.build_with_progress(|_, _, _| {})
    }

    /// Like [`build`](Self::build), calling `progress(index, total, path)`
    /// before each payload is read.
    ///
    /// The first read failure aborts the build.
    pub fn build_with_progress<F>(self, mut progress: F) -> ArchiveResult<Archive>
    where
        F: FnMut(usize, usize, &Path),
    {
        let lengths: Vec<u32> = self.sources.iter().map(|(_, loc)| loc.length).collect();
        let entries = layout(&lengths)?;

        let payload_len: u64 = lengths.iter().map(|&l| u64::from(l)).sum();
        let mut payload = Vec::with_capacity(payload_len as usize);
        let total = self.sources.len();

        for (index, (path, location)) in self.sources.iter().enumerate() {
            progress(index, total, path);
            let bytes = read_payload(path, *location).map_err(|source| {
                ArchiveError::PayloadRead {
                    path: path.clone(),
                    source,
                }
            })?;
            debug!(
                "packed {} ({} bytes at archive offset {})",
                path.display(),
                bytes.len(),
                entries[index].offset
            );
            payload.extend_from_slice(&bytes);
        }

        Ok(Archive { entries, payload })
    }
}

/// Reads exactly `location.length` bytes starting at `location.offset`.
pub fn read_payload(path: &Path, location: PayloadLocation) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(u64::from(location.offset)))?;
    let mut buffer = vec![0u8; location.length as usize];
    file.read_exact(&mut buffer)?;
    Ok(buffer)
}
