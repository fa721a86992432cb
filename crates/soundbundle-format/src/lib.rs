//! Sound bank packing
//!
//! This crate packs a collection of WAV files into one binary archive plus a
//! text manifest, so a game or app can load a single file and address each
//! clip by offset and length.
//!
//! # Overview
//!
//! - [`wav`] - checks the fixed header profile (PCM, mono, 22050 Hz, 16-bit)
//!   and locates the PCM payload behind an optional `LIST` chunk
//! - [`archive`] - computes the lookup table and assembles, writes and reads
//!   archives
//! - [`manifest`] - writes and reads the `index,path` map file
//! - [`pipeline`] - drives discovery, scanning, ordering, building and
//!   writing, reporting progress through a callback
//!
//! # Example
//!
//! ```ignore
//! use soundbundle_format::pipeline::{run, PackConfig};
//!
//! let config = PackConfig::new("assets/sfx")
//!     .archive_path("build/sounds.bin")
//!     .manifest_path("build/map.csv");
//! let summary = run(&config)?;
//! println!("packed {} clips", summary.packed.len());
//! ```

pub mod archive;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod wav;

pub use archive::{Archive, ArchiveBuilder, ArchiveEntry};
pub use error::{ArchiveError, FormatError, ManifestError, PackError, ValidationFailure};
pub use manifest::{Manifest, ManifestEntry};
pub use pipeline::{PackConfig, PackSummary, ProgressEvent};
pub use wav::PayloadLocation;
