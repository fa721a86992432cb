//! Locates the PCM payload of a profile-conforming WAV file.
//!
//! Only two layouts are accepted after the 16-byte format chunk:
//! `data` directly at offset 36, or a single `LIST` chunk followed by
//! `data`. Anything else is rejected rather than walked.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::FormatError;

/// Offset of the first chunk tag after the format chunk.
pub const FIRST_CHUNK_OFFSET: u64 = 36;

const LIST_TAG: &[u8; 4] = b"LIST";
const DATA_TAG: &[u8; 4] = b"data";

/// Where a file's PCM samples live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLocation {
    /// File-relative offset of the first PCM byte.
    pub offset: u32,
    /// PCM byte count, as declared by the `data` chunk.
    pub length: u32,
}

impl PayloadLocation {
    /// One past the last payload byte.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }
}

/// Locates the payload of the file at `path`.
///
/// The declared `data` length is not checked against the file size; a
/// short file fails later, when its payload is read.
pub fn locate(path: impl AsRef<Path>) -> Result<PayloadLocation, FormatError> {
    let mut file = File::open(path.as_ref())?;
    locate_in(&mut file)
}

/// Locates the payload in an in-memory WAV file.
pub fn locate_bytes(data: &[u8]) -> Result<PayloadLocation, FormatError> {
    locate_in(&mut Cursor::new(data))
}

/// Locates the payload by reading chunk headers from `reader`.
pub fn locate_in<R: Read + Seek>(reader: &mut R) -> Result<PayloadLocation, FormatError> {
    let mut tag_offset = FIRST_CHUNK_OFFSET;
    reader.seek(SeekFrom::Start(tag_offset))?;
    let mut tag = read_tag(reader)?;

    if &tag == LIST_TAG {
        let list_len = reader.read_u32::<LittleEndian>()?;
        // Past the tag, then past the length field and the LIST body.
        tag_offset += 4 + 4 + u64::from(list_len);
        reader.seek(SeekFrom::Start(tag_offset))?;
        tag = read_tag(reader)?;

        if &tag != DATA_TAG {
            return Err(FormatError::UnexpectedChunk {
                offset: tag_offset,
                expected: "data",
                found: tag,
            });
        }
    } else if &tag != DATA_TAG {
        return Err(FormatError::UnexpectedChunk {
            offset: tag_offset,
            expected: "LIST or data",
            found: tag,
        });
    }

    let length = reader.read_u32::<LittleEndian>()?;
    let payload_start = tag_offset + 8;
    let offset = u32::try_from(payload_start).map_err(|_| FormatError::OffsetOverflow {
        offset: payload_start,
    })?;

    Ok(PayloadLocation { offset, length })
}

fn read_tag<R: Read>(reader: &mut R) -> std::io::Result<[u8; 4]> {
    let mut tag = [0u8; 4];
    reader.read_exact(&mut tag)?;
    Ok(tag)
}
