//! Inspect command implementation
//!
//! Reads an archive back and lists its lookup table, optionally joined with
//! the manifest written alongside it.

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::process::ExitCode;

use soundbundle_format::{Archive, Manifest};

use super::json_output::{error_codes, InspectOutput, JsonError};

/// Run the inspect command.
///
/// # Arguments
/// * `archive_path` - Archive to read
/// * `map_path` - Optional manifest naming each entry
/// * `json_output` - Whether to print JSON instead of a table
///
/// # Returns
/// Exit code: 0 if the archive parsed, 1 otherwise
pub fn run(archive_path: &str, map_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    info!("inspect: archive={} map={:?}", archive_path, map_path);
    if json_output {
        let output = match load(archive_path, map_path) {
            Ok((archive, manifest)) => InspectOutput::from_archive(&archive, manifest.as_ref()),
            Err(error) => InspectOutput::failure(error),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let archive = Archive::open(archive_path)
        .with_context(|| format!("Failed to read archive: {}", archive_path))?;
    let manifest = map_path
        .map(|p| Manifest::load(p).with_context(|| format!("Failed to read manifest: {}", p)))
        .transpose()?;

    print_table(archive_path, &archive, manifest.as_ref());
    Ok(ExitCode::SUCCESS)
}

fn load(
    archive_path: &str,
    map_path: Option<&str>,
) -> std::result::Result<(Archive, Option<Manifest>), JsonError> {
    let archive = Archive::open(archive_path).map_err(|e| {
        JsonError::new(error_codes::ARCHIVE_READ, e.to_string()).with_file(archive_path)
    })?;
    let manifest = map_path
        .map(|p| {
            Manifest::load(p)
                .map_err(|e| JsonError::new(error_codes::MANIFEST_READ, e.to_string()).with_file(p))
        })
        .transpose()?;
    Ok((archive, manifest))
}

fn print_table(archive_path: &str, archive: &Archive, manifest: Option<&Manifest>) {
    println!(
        "{} {} {}",
        archive_path.bold(),
        "•".dimmed(),
        format!(
            "{} entries, {} bytes",
            archive.entry_count(),
            archive.total_len()
        )
        .dimmed()
    );

    if let Some(manifest) = manifest {
        if manifest.len() != archive.entries().len() {
            eprintln!(
                "  {} manifest has {} entries, archive has {}",
                "!".yellow(),
                manifest.len(),
                archive.entries().len()
            );
        }
    }

    println!("  {:>5}  {:>10}  {:>10}  path", "index", "offset", "length");
    for (i, entry) in archive.entries().iter().enumerate() {
        let path = manifest
            .and_then(|m| m.path_of(i as u32))
            .unwrap_or("-");
        println!(
            "  {:>5}  {:>10}  {:>10}  {}",
            format!("{:04}", i),
            entry.offset,
            entry.length,
            path
        );
    }
}
