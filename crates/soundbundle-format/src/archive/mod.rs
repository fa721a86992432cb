//! Sound bank archive layout, builder and reader.
//!
//! An archive is a single little-endian byte stream:
//!
//! ```text
//! [u32 entry_count][entry_count x (u32 offset, u32 length)][payload bytes]
//! ```
//!
//! Offsets are absolute within the archive. Payloads are stored back to
//! back in entry order, so entry `i + 1` starts exactly where entry `i`
//! ends.

mod builder;
mod layout;
mod reader;


use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

pub use builder::{read_payload, ArchiveBuilder};
pub use layout::{header_len, layout, ENTRY_LEN};

use crate::error::{ArchiveError, ArchiveResult};

/// One lookup-table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Archive-relative offset of the first payload byte.
    pub offset: u32,
    /// Payload byte count.
    pub length: u32,
}

impl ArchiveEntry {
    /// One past the last payload byte.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }
}

/// A fully assembled archive held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    payload: Vec<u8>,
}

impl Archive {
    /// Lookup-table entries in archive order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Concatenated payload bytes, without the header.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of entries, as written to the header.
    pub fn entry_count(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Size of the count field plus lookup table.
    pub fn header_len(&self) -> u64 {
        header_len(self.entries.len())
    }

    /// Total serialized size in bytes.
    pub fn total_len(&self) -> u64 {
        self.header_len() + self.payload.len() as u64
    }

    /// Payload bytes of entry `index`.
    pub fn clip(&self, index: usize) -> Option<&[u8]> {
        let entry = self.entries.get(index)?;
        let start = (u64::from(entry.offset) - self.header_len()) as usize;
        self.payload.get(start..start + entry.length as usize)
    }

    /// Writes count, lookup table and payload to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.entry_count())?;
        for entry in &self.entries {
            writer.write_u32::<LittleEndian>(entry.offset)?;
            writer.write_u32::<LittleEndian>(entry.length)?;
        }
        writer.write_all(&self.payload)
    }

    /// Serializes the archive to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.total_len() as usize);
        self.write_to(&mut buffer)
            .expect("writing to Vec should not fail");
        buffer
    }

    /// Writes the archive to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> ArchiveResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush().map_err(ArchiveError::from)
    }
}
