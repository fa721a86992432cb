//! Pack command implementation
//!
//! Scans a source directory for WAV files matching the required profile,
//! packs their PCM payloads into one archive and writes the manifest.

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use soundbundle_format::pipeline::{self, PackConfig, PackSummary, ProgressEvent};
use soundbundle_format::{ArchiveError, PackError};

use super::json_output::{error_codes, JsonError, PackOutput};

/// Run the pack command.
///
/// # Arguments
/// * `src` - Directory scanned recursively for source files
/// * `dest` - Archive output path
/// * `map_out` - Manifest output path
/// * `map_in` - Optional manifest whose order is applied first
/// * `json_output` - Whether to print a JSON report instead of text
///
/// # Returns
/// Exit code: 0 on success, 1 if the archive could not be produced
pub fn run(
    src: &str,
    dest: &str,
    map_out: &str,
    map_in: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let config = PackConfig::new(src)
        .archive_path(dest)
        .manifest_path(map_out)
        .input_manifest(map_in.map(PathBuf::from));
    info!(
        "pack: src={} dest={} map_out={} map_in={:?}",
        src, dest, map_out, map_in
    );

    if json_output {
        return run_json(&config, dest, map_out);
    }

    let start = Instant::now();
    println!("Packing {} -> {}", src.cyan(), dest.cyan());

    let summary = pipeline::run_with_progress(&config, print_event)
        .with_context(|| format!("Failed to pack {}", src))?;
    log_summary(&summary);

    print_summary(&summary, &config, start.elapsed().as_secs_f64());
    Ok(ExitCode::SUCCESS)
}

fn run_json(config: &PackConfig, dest: &str, map_out: &str) -> Result<ExitCode> {
    let (output, code) = match pipeline::run(config) {
        Ok(summary) => {
            log_summary(&summary);
            (
                PackOutput::from_summary(&summary, dest, map_out),
                ExitCode::SUCCESS,
            )
        }
        Err(e) => (
            PackOutput::failure(dest, map_out, pack_error_to_json(&e)),
            ExitCode::from(1),
        ),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

fn log_summary(summary: &PackSummary) {
    info!(
        "packed {} of {} files ({} bytes, blake3 {})",
        summary.packed.len(),
        summary.discovered,
        summary.archive_bytes,
        summary.archive_hash
    );
}

/// Maps a fatal packing error to its stable JSON code.
pub(crate) fn pack_error_to_json(err: &PackError) -> JsonError {
    let message = err.to_string();
    match err {
        PackError::SourceNotDirectory(path) => {
            JsonError::new(error_codes::SOURCE_DIR, message).with_file(path.display().to_string())
        }
        PackError::InputManifest { path, .. } => {
            JsonError::new(error_codes::INPUT_MANIFEST, message)
                .with_file(path.display().to_string())
        }
        PackError::Archive(ArchiveError::PayloadRead { path, .. }) => {
            JsonError::new(error_codes::PAYLOAD_READ, message)
                .with_file(path.display().to_string())
        }
        PackError::Archive(_) => JsonError::new(error_codes::ARCHIVE_TOO_LARGE, message),
        PackError::WriteArchive { path, .. } => {
            JsonError::new(error_codes::ARCHIVE_WRITE, message)
                .with_file(path.display().to_string())
        }
        PackError::WriteManifest { path, .. } => {
            JsonError::new(error_codes::MANIFEST_WRITE, message)
                .with_file(path.display().to_string())
        }
    }
}

fn print_event(event: ProgressEvent<'_>) {
    match event {
        ProgressEvent::Discovered { count } => {
            println!("Files found: {}. Validating...", count);
        }
        ProgressEvent::Validating { .. } => {}
        ProgressEvent::Skipped(file) => {
            eprintln!(
                "  {} {} {}",
                "!".yellow(),
                file.path.display(),
                format!("({})", file.reason).dimmed()
            );
        }
        ProgressEvent::OrderingMissing { path } => {
            eprintln!(
                "  {} map entry not found: {}",
                "!".yellow(),
                path.display()
            );
        }
        ProgressEvent::Collecting { index, total, path } => {
            if index == 0 {
                println!("Valid files found: {}. Collecting file data...", total);
            }
            let progress = format!("[{}/{}]", index + 1, total).cyan().bold();
            println!("  {} {}", progress, path.display());
        }
        ProgressEvent::ArchiveWritten { path, bytes } => {
            println!(
                "  {} Wrote {} {}",
                "✓".green(),
                path.display(),
                format!("({} bytes)", bytes).dimmed()
            );
        }
        ProgressEvent::ManifestWritten { path, entries } => {
            println!(
                "  {} Wrote {} {}",
                "✓".green(),
                path.display(),
                format!("({} entries)", entries).dimmed()
            );
        }
    }
}

fn print_summary(summary: &PackSummary, config: &PackConfig, elapsed: f64) {
    println!("\n{}", "=".repeat(60));
    println!(
        "{} {} {}",
        "Pack Summary".bold(),
        "•".dimmed(),
        format!("{:.1}s", elapsed).dimmed()
    );
    println!("  Found:   {}", summary.discovered);
    println!("  Packed:  {}", summary.packed.len().to_string().green());
    println!(
        "  Skipped: {}",
        if summary.skipped.is_empty() {
            summary.skipped.len().to_string().normal()
        } else {
            summary.skipped.len().to_string().yellow()
        }
    );
    println!("Archive:  {}", config.archive_path.display());
    println!("Manifest: {}", config.manifest_path.display());
    println!("BLAKE3:   {}", summary.archive_hash.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundbundle_format::ManifestError;

    #[test]
    fn test_error_codes_carry_file() {
        let err = PackError::SourceNotDirectory(PathBuf::from("nowhere"));
        let json = pack_error_to_json(&err);
        assert_eq!(json.code, error_codes::SOURCE_DIR);
        assert_eq!(json.file.as_deref(), Some("nowhere"));

        let err = PackError::WriteManifest {
            path: PathBuf::from("out/map.csv"),
            source: ManifestError::Io(std::io::Error::other("read-only")),
        };
        let json = pack_error_to_json(&err);
        assert_eq!(json.code, error_codes::MANIFEST_WRITE);
        assert!(json.message.contains("read-only"));
    }

    #[test]
    fn test_too_large_has_no_file() {
        let err = PackError::Archive(ArchiveError::TooLarge {
            entries: 2,
            payload_bytes: 1 << 33,
        });
        let json = pack_error_to_json(&err);
        assert_eq!(json.code, error_codes::ARCHIVE_TOO_LARGE);
        assert!(json.file.is_none());
    }
}
