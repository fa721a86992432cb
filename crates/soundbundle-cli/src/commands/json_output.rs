//! JSON output types for machine-readable CLI output.
//!
//! Emitted by `pack --json` and `inspect --json` so build scripts can parse
//! results without scraping colored text.

use serde::{Deserialize, Serialize};
use soundbundle_format::pipeline::{PackSummary, SkipReason};
use soundbundle_format::{Archive, Manifest};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Source directory missing or not a directory
    pub const SOURCE_DIR: &str = "CLI_001";
    /// Input manifest could not be read
    pub const INPUT_MANIFEST: &str = "CLI_002";
    /// Source payload could not be read during the build
    pub const PAYLOAD_READ: &str = "CLI_003";
    /// Archive would exceed the 32-bit offset range
    pub const ARCHIVE_TOO_LARGE: &str = "CLI_004";
    /// Archive file could not be written
    pub const ARCHIVE_WRITE: &str = "CLI_005";
    /// Manifest file could not be written
    pub const MANIFEST_WRITE: &str = "CLI_006";
    /// Archive file could not be read or parsed
    pub const ARCHIVE_READ: &str = "CLI_007";
    /// Manifest file could not be read or parsed
    pub const MANIFEST_READ: &str = "CLI_008";
}

/// Skip codes for files left out of an archive.
pub mod skip_codes {
    /// Directory entry could not be read
    pub const UNREADABLE: &str = "SKIP_001";
    /// Header does not match the required profile
    pub const INVALID_PROFILE: &str = "SKIP_002";
    /// Chunk layout not supported
    pub const UNSUPPORTED_LAYOUT: &str = "SKIP_003";
    /// Path is not valid UTF-8
    pub const NON_UTF8_PATH: &str = "SKIP_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// File the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// One packed file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackedEntryJson {
    /// Archive slot
    pub index: u32,
    /// Source path
    pub path: String,
    /// Archive-relative offset
    pub offset: u32,
    /// Payload length in bytes
    pub length: u32,
}

/// One skipped file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedJson {
    /// Source path
    pub path: String,
    /// Stable skip code (e.g., "SKIP_002")
    pub code: String,
    /// Human-readable reason
    pub reason: String,
}

/// Output of `pack --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackOutput {
    /// Whether the archive and manifest were written
    pub success: bool,
    /// Archive destination
    pub archive: String,
    /// Manifest destination
    pub manifest: String,
    /// Candidate files found
    pub discovered: usize,
    /// Packed files, in archive order
    pub packed: Vec<PackedEntryJson>,
    /// Files left out
    pub skipped: Vec<SkippedJson>,
    /// Archive size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_bytes: Option<u64>,
    /// BLAKE3 hash of the archive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_hash: Option<String>,
    /// Fatal errors
    pub errors: Vec<JsonError>,
}

impl PackOutput {
    /// Builds the output of a successful run.
    pub fn from_summary(summary: &PackSummary, archive: &str, manifest: &str) -> Self {
        let packed = summary
            .packed
            .iter()
            .enumerate()
            .map(|(i, p)| PackedEntryJson {
                index: i as u32,
                path: p.path.display().to_string(),
                offset: p.entry.offset,
                length: p.entry.length,
            })
            .collect();

        let skipped = summary
            .skipped
            .iter()
            .map(|s| SkippedJson {
                path: s.path.display().to_string(),
                code: skip_code(&s.reason).to_string(),
                reason: s.reason.to_string(),
            })
            .collect();

        Self {
            success: true,
            archive: archive.to_string(),
            manifest: manifest.to_string(),
            discovered: summary.discovered,
            packed,
            skipped,
            archive_bytes: Some(summary.archive_bytes),
            archive_hash: Some(summary.archive_hash.clone()),
            errors: vec![],
        }
    }

    /// Builds the output of a failed run.
    pub fn failure(archive: &str, manifest: &str, error: JsonError) -> Self {
        Self {
            success: false,
            archive: archive.to_string(),
            manifest: manifest.to_string(),
            discovered: 0,
            packed: vec![],
            skipped: vec![],
            archive_bytes: None,
            archive_hash: None,
            errors: vec![error],
        }
    }
}

fn skip_code(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::Unreadable(_) => skip_codes::UNREADABLE,
        SkipReason::Invalid(_) => skip_codes::INVALID_PROFILE,
        SkipReason::Format(_) => skip_codes::UNSUPPORTED_LAYOUT,
        SkipReason::NonUtf8Path => skip_codes::NON_UTF8_PATH,
    }
}

/// One archive entry in `inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InspectEntryJson {
    /// Archive slot
    pub index: u32,
    /// Archive-relative offset
    pub offset: u32,
    /// Payload length in bytes
    pub length: u32,
    /// Source path from the manifest (if one was given)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Output of `inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InspectOutput {
    /// Whether the archive could be read
    pub success: bool,
    /// Number of entries
    pub entry_count: u32,
    /// Total archive size in bytes
    pub total_bytes: u64,
    /// Entries in archive order
    pub entries: Vec<InspectEntryJson>,
    /// Fatal errors
    pub errors: Vec<JsonError>,
}

impl InspectOutput {
    /// Builds the output for a parsed archive and optional manifest.
    pub fn from_archive(archive: &Archive, manifest: Option<&Manifest>) -> Self {
        let entries = archive
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| InspectEntryJson {
                index: i as u32,
                offset: e.offset,
                length: e.length,
                path: manifest
                    .and_then(|m| m.path_of(i as u32))
                    .map(str::to_string),
            })
            .collect();

        Self {
            success: true,
            entry_count: archive.entry_count(),
            total_bytes: archive.total_len(),
            entries,
            errors: vec![],
        }
    }

    /// Builds the output of a failed inspection.
    pub fn failure(error: JsonError) -> Self {
        Self {
            success: false,
            entry_count: 0,
            total_bytes: 0,
            entries: vec![],
            errors: vec![error],
        }
    }
}
