//! Error types for sound bank packing.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Value a profile field was expected to hold, or was found holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Four-byte ASCII tag.
    Tag([u8; 4]),
    /// Little-endian 16-bit integer.
    U16(u16),
    /// Little-endian 32-bit integer.
    U32(u32),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Tag(tag) => write!(f, "'{}'", String::from_utf8_lossy(tag)),
            FieldValue::U16(v) => write!(f, "{}", v),
            FieldValue::U32(v) => write!(f, "{}", v),
        }
    }
}

/// A file that does not match the required WAV profile.
///
/// Never fatal: the file is excluded from the archive and the run continues.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    /// The file could not be opened or read.
    #[error("could not read header: {0}")]
    Io(#[from] std::io::Error),

    /// The file ends before the fixed header region does.
    #[error("file too short: {len} bytes (minimum {required} required)")]
    TooShort {
        /// Actual file length.
        len: usize,
        /// Bytes the profile check needs.
        required: usize,
    },

    /// A header field holds an unexpected value.
    #[error("{field} mismatch at offset {offset}: expected {expected}, found {found}")]
    Mismatch {
        /// Name of the profile field.
        field: &'static str,
        /// Byte offset of the field.
        offset: usize,
        /// Required value.
        expected: FieldValue,
        /// Value present in the file.
        found: FieldValue,
    },
}

/// Chunk structure after the format chunk is not one this packer accepts.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Reading the chunk headers failed.
    #[error("could not read chunk header: {0}")]
    Io(#[from] std::io::Error),

    /// A tag other than `LIST` or `data` was found.
    #[error("unrecognized chunk at offset {offset}: expected {expected}, found '{}'", String::from_utf8_lossy(.found))]
    UnexpectedChunk {
        /// Offset of the offending tag.
        offset: u64,
        /// What was acceptable at that position.
        expected: &'static str,
        /// Tag bytes present in the file.
        found: [u8; 4],
    },

    /// A chunk offset does not fit in 32 bits.
    #[error("chunk offset {offset} exceeds the 32-bit range")]
    OffsetOverflow {
        /// The offending offset.
        offset: u64,
    },
}

/// Errors raised while building or reading an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Reading a source payload failed. Aborts the build.
    #[error("could not read payload from {}: {source}", .path.display())]
    PayloadRead {
        /// Source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive would exceed the 32-bit offset range.
    #[error("archive too large: {entries} entries with {payload_bytes} payload bytes exceed the 32-bit offset range")]
    TooLarge {
        /// Number of entries.
        entries: usize,
        /// Total payload length.
        payload_bytes: u64,
    },

    /// The archive bytes are shorter than the header says.
    #[error("archive truncated: {needed} bytes required, {len} available")]
    Truncated {
        /// Bytes the header requires.
        needed: u64,
        /// Bytes present.
        len: usize,
    },

    /// An entry does not start where the previous one ended.
    #[error("entry {index} starts at {offset}, expected {expected}")]
    NonContiguous {
        /// Entry index.
        index: usize,
        /// Recorded offset.
        offset: u32,
        /// Offset implied by the previous entry.
        expected: u64,
    },

    /// File-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while writing or reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A manifest line could not be parsed.
    #[error("invalid manifest line {line}: {content:?}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// The raw line.
        content: String,
    },
}

/// Top-level error for a packing run.
#[derive(Debug, Error)]
pub enum PackError {
    /// The source root is missing or not a directory.
    #[error("source path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    /// The input manifest could not be loaded.
    #[error("could not load input manifest {}: {source}", .path.display())]
    InputManifest {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ManifestError,
    },

    /// Building the archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Writing the archive file failed.
    #[error("could not write archive {}: {source}", .path.display())]
    WriteArchive {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ArchiveError,
    },

    /// Writing the output manifest failed.
    #[error("could not write manifest {}: {source}", .path.display())]
    WriteManifest {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ManifestError,
    },
}
