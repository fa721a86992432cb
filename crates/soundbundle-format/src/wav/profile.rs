//! Fixed WAV header profile accepted by the packer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::{FieldValue, ValidationFailure};

/// Number of leading bytes covered by the profile check.
pub const HEADER_LEN: usize = 36;

/// Sample rate every packed file must use.
pub const REQUIRED_SAMPLE_RATE: u32 = 22050;

/// Bit depth every packed file must use.
pub const REQUIRED_BITS_PER_SAMPLE: u16 = 16;

/// One fixed-offset header field and the value it must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileField {
    /// Human-readable field name.
    pub name: &'static str,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Required value; its variant also fixes the field width.
    pub expected: FieldValue,
}

impl ProfileField {
    const fn new(name: &'static str, offset: usize, expected: FieldValue) -> Self {
        Self {
            name,
            offset,
            expected,
        }
    }

    /// Width of the field in bytes.
    pub fn width(&self) -> usize {
        match self.expected {
            FieldValue::Tag(_) | FieldValue::U32(_) => 4,
            FieldValue::U16(_) => 2,
        }
    }

    /// Reads this field's current value out of `header`.
    ///
    /// `header` must be at least `offset + width` bytes long.
    fn read(&self, header: &[u8]) -> FieldValue {
        let bytes = &header[self.offset..self.offset + self.width()];
        match self.expected {
            FieldValue::Tag(_) => FieldValue::Tag([bytes[0], bytes[1], bytes[2], bytes[3]]),
            FieldValue::U16(_) => FieldValue::U16(LittleEndian::read_u16(bytes)),
            FieldValue::U32(_) => FieldValue::U32(LittleEndian::read_u32(bytes)),
        }
    }
}

/// RIFF/WAVE, PCM, mono, 22050 Hz, 16-bit. Checked in order.
pub const REQUIRED_PROFILE: &[ProfileField] = &[
    ProfileField::new("RIFF marker", 0, FieldValue::Tag(*b"RIFF")),
    ProfileField::new("WAVE marker", 8, FieldValue::Tag(*b"WAVE")),
    ProfileField::new("audio format", 20, FieldValue::U16(1)),
    ProfileField::new("channel count", 22, FieldValue::U16(1)),
    ProfileField::new("sample rate", 24, FieldValue::U32(REQUIRED_SAMPLE_RATE)),
    ProfileField::new(
        "bits per sample",
        34,
        FieldValue::U16(REQUIRED_BITS_PER_SAMPLE),
    ),
];

/// Checks in-memory header bytes against [`REQUIRED_PROFILE`].
///
/// Only the first [`HEADER_LEN`] bytes are inspected; anything after them
/// is ignored.
pub fn check_bytes(header: &[u8]) -> Result<(), ValidationFailure> {
    if header.len() < HEADER_LEN {
        return Err(ValidationFailure::TooShort {
            len: header.len(),
            required: HEADER_LEN,
        });
    }

    for field in REQUIRED_PROFILE {
        let found = field.read(header);
        if found != field.expected {
            return Err(ValidationFailure::Mismatch {
                field: field.name,
                offset: field.offset,
                expected: field.expected,
                found,
            });
        }
    }

    Ok(())
}

/// Checks the file at `path` against [`REQUIRED_PROFILE`].
pub fn check_profile(path: impl AsRef<Path>) -> Result<(), ValidationFailure> {
    let file = File::open(path.as_ref())?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    check_bytes(&header)
}

/// Returns whether the file at `path` matches the required profile.
///
/// Never fails; an unreadable file is simply not valid.
pub fn validate(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match check_profile(path) {
        Ok(()) => true,
        Err(e) => {
            debug!("{} rejected: {}", path.display(), e);
            false
        }
    }
}
