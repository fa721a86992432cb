//! Sound bundler CLI - packs WAV files into a single sound bank archive
//!
//! This binary provides commands for packing a directory of WAV files into an
//! archive plus manifest, and for inspecting an existing archive.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use soundbundle_cli::commands;
use soundbundle_format::pipeline::{DEFAULT_ARCHIVE_PATH, DEFAULT_MANIFEST_PATH, DEFAULT_SOURCE_DIR};

/// Sound bundler - WAV sound bank packer
#[derive(Parser)]
#[command(name = "soundbundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack every matching WAV file under a directory into one archive
    Pack {
        /// Source directory of sound files
        #[arg(long, default_value = DEFAULT_SOURCE_DIR)]
        src: String,

        /// Path of the output archive
        #[arg(long, default_value = DEFAULT_ARCHIVE_PATH)]
        dest: String,

        /// Path of the output map (manifest) file
        #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
        map_out: String,

        /// Path of an input map whose order is applied first
        #[arg(long)]
        map_in: Option<String>,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the entries of an existing archive
    Inspect {
        /// Path of the archive to read
        #[arg(short, long)]
        archive: String,

        /// Map file written alongside the archive
        #[arg(short, long)]
        map: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pack {
            src,
            dest,
            map_out,
            map_in,
            json,
        } => commands::pack::run(&src, &dest, &map_out, map_in.as_deref(), json),
        Commands::Inspect { archive, map, json } => {
            commands::inspect::run(&archive, map.as_deref(), json)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
