//! Reading archives back from bytes.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{header_len, Archive, ArchiveEntry};
use crate::error::{ArchiveError, ArchiveResult};

impl Archive {
    /// Parses a serialized archive.
    ///
    /// Checks that the lookup table fits, that entries are contiguous and
    /// start right after the table, and that the payload is complete.
    /// Trailing bytes after the last payload are ignored.
    pub fn parse(data: &[u8]) -> ArchiveResult<Self> {
        let len = data.len();
        let mut cursor = Cursor::new(data);
        let count = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| ArchiveError::Truncated { needed: 4, len })?;

        let header = header_len(count as usize);
        if (len as u64) < header {
            return Err(ArchiveError::Truncated {
                needed: header,
                len,
            });
        }

        let mut entries = Vec::with_capacity(count as usize);
        let mut expected = header;
        for index in 0..count as usize {
            let offset = cursor.read_u32::<LittleEndian>()?;
            let length = cursor.read_u32::<LittleEndian>()?;
            if u64::from(offset) != expected {
                return Err(ArchiveError::NonContiguous {
                    index,
                    offset,
                    expected,
                });
            }
            expected += u64::from(length);
            entries.push(ArchiveEntry { offset, length });
        }

        if (len as u64) < expected {
            return Err(ArchiveError::Truncated {
                needed: expected,
                len,
            });
        }

        Ok(Archive {
            entries,
            payload: data[header as usize..expected as usize].to_vec(),
        })
    }

    /// Reads and parses the archive at `path`.
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let data = fs::read(path.as_ref())?;
        Self::parse(&data)
    }
}
