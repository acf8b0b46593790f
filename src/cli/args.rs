//! Defines the command-line arguments and subcommands for the palimpsest CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "palimpsest",
    version,
    about = "Accept stale example output by rewriting it in the source files."
)]
pub struct PalimpsestArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a session record stream and rewrite stale expected outputs.
    Apply {
        /// Path to the JSON Lines record file, or `-` for stdin.
        #[arg(required = true)]
        records: PathBuf,
        /// Overwrite source files in place.
        #[arg(long)]
        accept: bool,
        /// Write `<file>.new` siblings and leave the originals untouched.
        #[arg(long)]
        accept_copy: bool,
        /// Skip files that were never fingerprinted instead of overwriting
        /// them.
        #[arg(long)]
        strict: bool,
        /// Print a colored diff for every rewritten file.
        #[arg(long)]
        diff: bool,
    },
    /// Print content fingerprints for files or directory trees.
    Fingerprint {
        /// Files or directories to fingerprint.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// When walking a directory, only fingerprint files with this
        /// extension.
        #[arg(long)]
        ext: Option<String>,
        /// Emit `collect` events as JSON Lines instead of plain checksums.
        #[arg(long)]
        json: bool,
    },
}
