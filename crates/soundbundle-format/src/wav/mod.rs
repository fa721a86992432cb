//! WAV header validation and PCM payload location.
//!
//! This is not a general WAV parser. Files must match one fixed profile
//! (PCM, mono, 22050 Hz, 16-bit) and one of two chunk layouts.

mod chunk;
mod profile;


// Re-export public API
pub use chunk::{locate, locate_bytes, locate_in, PayloadLocation, FIRST_CHUNK_OFFSET};
pub use profile::{
    check_bytes, check_profile, validate, ProfileField, HEADER_LEN, REQUIRED_BITS_PER_SAMPLE,
    REQUIRED_PROFILE, REQUIRED_SAMPLE_RATE,
};
