//! End-to-end packing: discover, scan, order, build, write.
//!
//! Each phase finishes before the next starts. Per-file problems during
//! discovery and scanning drop the file and are reported through
//! [`ProgressEvent::Skipped`]; anything that goes wrong while building or
//! writing aborts the run.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::archive::{Archive, ArchiveBuilder, ArchiveEntry};
use crate::error::{FormatError, PackError, ValidationFailure};
use crate::manifest::Manifest;
use crate::wav::{self, PayloadLocation};

/// Default source directory.
pub const DEFAULT_SOURCE_DIR: &str = ".";
/// Default archive path.
pub const DEFAULT_ARCHIVE_PATH: &str = "sounds.bin";
/// Default output manifest path.
pub const DEFAULT_MANIFEST_PATH: &str = "map.csv";

/// Inputs and outputs of a packing run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackConfig {
    /// Directory searched recursively for source files.
    pub source_dir: PathBuf,
    /// Destination of the binary archive.
    pub archive_path: PathBuf,
    /// Destination of the output manifest.
    pub manifest_path: PathBuf,
    /// Manifest whose order should be applied to the scanned files.
    pub input_manifest: Option<PathBuf>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            input_manifest: None,
        }
    }
}

impl PackConfig {
    /// Creates a configuration with default output paths for `source_dir`.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the archive destination.
    pub fn archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = path.into();
        self
    }

    /// Sets the output manifest destination.
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Sets the manifest used to order the scanned files.
    pub fn input_manifest(mut self, path: Option<PathBuf>) -> Self {
        self.input_manifest = path;
        self
    }
}

/// A file that passed validation and chunk location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedFile {
    /// Source path.
    pub path: PathBuf,
    /// Where its PCM payload lives.
    pub location: PayloadLocation,
}

/// Why a file was left out of the archive.
#[derive(Debug)]
pub enum SkipReason {
    /// The directory walk could not read the entry.
    Unreadable(walkdir::Error),
    /// The path cannot be written to a manifest unchanged.
    NonUtf8Path,
    /// The header does not match the required profile.
    Invalid(ValidationFailure),
    /// The chunk layout after the format chunk was not accepted.
    Format(FormatError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(e) => write!(f, "unreadable: {}", e),
            SkipReason::NonUtf8Path => write!(f, "path is not valid UTF-8"),
            SkipReason::Invalid(e) => write!(f, "not a valid WAV file: {}", e),
            SkipReason::Format(e) => write!(f, "unsupported chunk layout: {}", e),
        }
    }
}

/// A skipped file and the reason.
#[derive(Debug)]
pub struct SkippedFile {
    /// Source path.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Progress notifications emitted during a run.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Discovery finished with `count` candidate files.
    Discovered {
        /// Candidate count.
        count: usize,
    },
    /// About to validate file `index` of `total`.
    Validating {
        /// Zero-based position.
        index: usize,
        /// Candidate count.
        total: usize,
        /// File being validated.
        path: &'a Path,
    },
    /// A file was dropped.
    Skipped(&'a SkippedFile),
    /// About to read the payload of file `index` of `total`.
    Collecting {
        /// Zero-based archive slot.
        index: usize,
        /// Entry count.
        total: usize,
        /// File being read.
        path: &'a Path,
    },
    /// The input manifest names a file that was not scanned.
    OrderingMissing {
        /// Path as written in the input manifest.
        path: &'a Path,
    },
    /// The archive file has been written.
    ArchiveWritten {
        /// Destination.
        path: &'a Path,
        /// Bytes written.
        bytes: u64,
    },
    /// The manifest file has been written.
    ManifestWritten {
        /// Destination.
        path: &'a Path,
        /// Lines written.
        entries: usize,
    },
}

/// A file as placed in the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedFile {
    /// Source path.
    pub path: PathBuf,
    /// Lookup-table record.
    pub entry: ArchiveEntry,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct PackSummary {
    /// Candidate files found by discovery.
    pub discovered: usize,
    /// Files left out, with reasons.
    pub skipped: Vec<SkippedFile>,
    /// Files packed, in archive order.
    pub packed: Vec<PackedFile>,
    /// Serialized archive size.
    pub archive_bytes: u64,
    /// BLAKE3 hex digest of the archive bytes.
    pub archive_hash: String,
}

/// Lists every non-directory entry below `root`, in lexical walk order.
///
/// Entries the walk cannot read, and files whose path is not UTF-8, are
/// returned separately.
pub fn discover(root: &Path) -> Result<(Vec<PathBuf>, Vec<SkippedFile>), PackError> {
    if !root.is_dir() {
        return Err(PackError::SourceNotDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {}
            Ok(entry) => {
                let path = entry.into_path();
                if path.to_str().is_some() {
                    files.push(path);
                } else {
                    warn!("skipping non-UTF-8 path {}", path.display());
                    skipped.push(SkippedFile {
                        path,
                        reason: SkipReason::NonUtf8Path,
                    });
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!("skipping unreadable entry {}: {}", path.display(), e);
                skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::Unreadable(e),
                });
            }
        }
    }

    debug!("discovered {} files under {}", files.len(), root.display());
    Ok((files, skipped))
}

/// Validates and locates each path, keeping the ones that pass.
pub fn scan<F>(paths: &[PathBuf], mut progress: F) -> (Vec<ScannedFile>, Vec<SkippedFile>)
where
    F: FnMut(ProgressEvent<'_>),
{
    let mut scanned = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    let total = paths.len();

    for (index, path) in paths.iter().enumerate() {
        progress(ProgressEvent::Validating { index, total, path });

        let reason = match wav::check_profile(path) {
            Err(e) => SkipReason::Invalid(e),
            Ok(()) => match wav::locate(path) {
                Ok(location) => {
                    scanned.push(ScannedFile {
                        path: path.clone(),
                        location,
                    });
                    continue;
                }
                Err(e) => SkipReason::Format(e),
            },
        };

        warn!("skipping {}: {}", path.display(), reason);
        let file = SkippedFile {
            path: path.clone(),
            reason,
        };
        progress(ProgressEvent::Skipped(&file));
        skipped.push(file);
    }

    (scanned, skipped)
}

/// Reorders `scanned` so files listed in `order` come first, in manifest
/// order, followed by the rest in their original order.
///
/// Returns the reordered files and the manifest paths that matched nothing.
pub fn apply_order(
    scanned: Vec<ScannedFile>,
    order: &Manifest,
) -> (Vec<ScannedFile>, Vec<PathBuf>) {
    let mut slots: Vec<Option<ScannedFile>> = scanned.into_iter().map(Some).collect();
    let positions: HashMap<PathBuf, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|f| (f.path.clone(), i)))
        .collect();

    let mut ordered = Vec::with_capacity(slots.len());
    let mut missing = Vec::new();

    for wanted in order.paths() {
        match positions.get(&wanted).and_then(|&i| slots[i].take()) {
            Some(file) => ordered.push(file),
            None => missing.push(wanted),
        }
    }

    ordered.extend(slots.into_iter().flatten());
    (ordered, missing)
}

/// Runs a full packing pass without progress reporting.
pub fn run(config: &PackConfig) -> Result<PackSummary, PackError> {
    run_with_progress(config, |_| {})
}

/// Runs a full packing pass, reporting progress through `progress`.
pub fn run_with_progress<F>(config: &PackConfig, mut progress: F) -> Result<PackSummary, PackError>
where
    F: FnMut(ProgressEvent<'_>),
{
    let (paths, mut skipped) = discover(&config.source_dir)?;
    for file in &skipped {
        progress(ProgressEvent::Skipped(file));
    }
    progress(ProgressEvent::Discovered { count: paths.len() });

    let (mut scanned, rejected) = scan(&paths, &mut progress);
    skipped.extend(rejected);

    if let Some(manifest_path) = &config.input_manifest {
        let order = Manifest::load(manifest_path).map_err(|source| PackError::InputManifest {
            path: manifest_path.clone(),
            source,
        })?;
        let (ordered, missing) = apply_order(scanned, &order);
        for path in &missing {
            warn!("input manifest entry not found: {}", path.display());
            progress(ProgressEvent::OrderingMissing { path });
        }
        scanned = ordered;
    }

    let mut builder = ArchiveBuilder::with_capacity(scanned.len());
    for file in &scanned {
        builder.push(file.path.clone(), file.location);
    }
    let archive = builder.build_with_progress(|index, total, path| {
        progress(ProgressEvent::Collecting { index, total, path })
    })?;

    let archive_hash = save_hashed(&archive, &config.archive_path).map_err(|e| {
        PackError::WriteArchive {
            path: config.archive_path.clone(),
            source: e.into(),
        }
    })?;
    let archive_bytes = archive.total_len();
    progress(ProgressEvent::ArchiveWritten {
        path: &config.archive_path,
        bytes: archive_bytes,
    });

    let manifest = Manifest::from_paths(scanned.iter().map(|f| &f.path));
    manifest
        .save(&config.manifest_path)
        .map_err(|source| PackError::WriteManifest {
            path: config.manifest_path.clone(),
            source,
        })?;
    progress(ProgressEvent::ManifestWritten {
        path: &config.manifest_path,
        entries: manifest.len(),
    });

    let packed = scanned
        .into_iter()
        .zip(archive.entries())
        .map(|(file, &entry)| PackedFile {
            path: file.path,
            entry,
        })
        .collect();

    Ok(PackSummary {
        discovered: paths.len(),
        skipped,
        packed,
        archive_bytes,
        archive_hash,
    })
}

/// Writes `archive` to `path` and returns the BLAKE3 hex digest of the
/// bytes written.
fn save_hashed(archive: &Archive, path: &Path) -> io::Result<String> {
    let mut writer = HashingWriter {
        inner: BufWriter::new(File::create(path)?),
        hasher: blake3::Hasher::new(),
    };
    archive.write_to(&mut writer)?;
    writer.flush()?;
    Ok(writer.hasher.finalize().to_hex().to_string())
}

/// Forwards writes to `inner`, hashing every byte it accepts.
struct HashingWriter<W> {
    inner: W,
    hasher: blake3::Hasher,
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
