//! Manifest (map) files correlating archive slots with source paths.
//!
//! One line per entry, in archive order:
//!
//! ```text
//! 0000,sounds/door_open.wav
//! 0001,sounds/door_close.wav
//! ```
//!
//! The index is zero-padded to four digits. Larger indices are written in
//! full; the padding is cosmetic.
//!
//! Input maps may also be a single comma-separated record of paths with no
//! indices (`a.wav,b.wav,`), as older packer versions wrote them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Archive slot.
    pub index: u32,
    /// Source path as written to the manifest.
    pub path: String,
}

/// Ordered list of archive slots and the files they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Builds a manifest numbering `paths` from zero, in order.
    ///
    /// Paths are stored as displayed, so a non-UTF-8 path is written lossily
    /// and will not match its file when read back.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let entries = paths
            .into_iter()
            .enumerate()
            .map(|(i, p)| ManifestEntry {
                index: i as u32,
                path: p.as_ref().display().to_string(),
            })
            .collect();
        Self { entries }
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry paths as filesystem paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.entries.iter().map(|e| PathBuf::from(&e.path))
    }

    /// Path recorded for archive slot `index`.
    pub fn path_of(&self, index: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.path.as_str())
    }

    /// Writes one `index,path` line per entry.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ManifestError> {
        for entry in &self.entries {
            writeln!(writer, "{:04},{}", entry.index, entry.path)?;
        }
        Ok(())
    }

    /// Renders the manifest as text.
    pub fn to_text(&self) -> String {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)
            .expect("writing to Vec should not fail");
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Writes the manifest to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parses manifest text.
    ///
    /// Blank lines are skipped. A line without a comma is taken as a bare
    /// path and numbered by its position. Text holding a single line whose
    /// first field is not an index is read as a record of bare paths.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let lines: Vec<(usize, &str, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, raw)| (i + 1, raw, raw.trim_end_matches('\r')))
            .filter(|(_, _, line)| !line.trim().is_empty())
            .collect();

        if let [(_, _, line)] = lines.as_slice() {
            if let Some((first, _)) = line.split_once(',') {
                if first.trim().parse::<u32>().is_err() {
                    return Ok(Self::from_record(line));
                }
            }
        }

        let mut entries = Vec::new();
        for (line_no, raw, line) in lines {
            let entry = match line.split_once(',') {
                Some((index, path)) => {
                    let index = index
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| ManifestError::InvalidLine {
                            line: line_no,
                            content: raw.to_string(),
                        })?;
                    ManifestEntry {
                        index,
                        path: path.to_string(),
                    }
                }
                None => ManifestEntry {
                    index: entries.len() as u32,
                    path: line.to_string(),
                },
            };
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    fn from_record(line: &str) -> Self {
        let entries = line
            .split(',')
            .filter(|field| !field.is_empty())
            .enumerate()
            .map(|(i, path)| ManifestEntry {
                index: i as u32,
                path: path.to_string(),
            })
            .collect();
        Self { entries }
    }

    /// Reads and parses the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }
}
