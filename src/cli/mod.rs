//! The palimpsest command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions: `apply` replays a session record stream into
//! an [`AcceptSession`] and reports what it did; `fingerprint` produces the
//! collection-time digests a host runner needs to emit `collect` events.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use miette::Report;
use walkdir::WalkDir;

use crate::cli::args::{Command, PalimpsestArgs};
use crate::error::AcceptError;
use crate::fingerprint::Fingerprint;
use crate::record::SessionEvent;
use crate::session::{AcceptSession, SessionObserver, WritePolicy};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = PalimpsestArgs::parse();

    let result = match args.command {
        Command::Apply {
            records,
            accept,
            accept_copy,
            strict,
            diff,
        } => {
            let policy = WritePolicy {
                accept,
                accept_copy,
                strict_untracked: strict,
            };
            handle_apply(&records, policy, diff)
        }
        Command::Fingerprint { paths, ext, json } => {
            handle_fingerprint(&paths, ext.as_deref(), json)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("{:?}", Report::new(error));
            process::exit(1);
        }
    }
}

/// Handles the `apply` subcommand.
fn handle_apply(records: &Path, policy: WritePolicy, show_diff: bool) -> Result<i32, AcceptError> {
    let mut session = AcceptSession::new(policy);
    ingest_records(records, &mut session)?;

    let summary = session.finish();
    output::report_summary(&summary, show_diff);
    Ok(if summary.any_failed() { 1 } else { 0 })
}

/// Feeds every event in a JSON Lines record file (or stdin, for `-`) into
/// the session. Blank lines are ignored; anything else that fails to parse
/// aborts with the offending line number.
fn ingest_records(records: &Path, session: &mut AcceptSession) -> Result<(), AcceptError> {
    let reader = open_records(records)?;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| AcceptError::Read {
            path: records.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let event: SessionEvent =
            serde_json::from_str(&line).map_err(|source| AcceptError::MalformedRecord {
                line: index + 1,
                source,
            })?;
        match event {
            SessionEvent::Collect { path, fingerprint } => {
                session.file_collected(&path, fingerprint);
            }
            SessionEvent::Failure(failure) => session.failure_observed(failure),
        }
    }
    Ok(())
}

fn open_records(records: &Path) -> Result<Box<dyn BufRead>, AcceptError> {
    if records.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = fs::File::open(records).map_err(|source| AcceptError::Read {
        path: records.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Handles the `fingerprint` subcommand.
fn handle_fingerprint(
    paths: &[PathBuf],
    ext: Option<&str>,
    json: bool,
) -> Result<i32, AcceptError> {
    for path in collect_files(paths, ext)? {
        let fingerprint = Fingerprint::of_file(&path).map_err(|source| AcceptError::Read {
            path: path.clone(),
            source,
        })?;
        if json {
            let event = SessionEvent::Collect {
                path: path.clone(),
                fingerprint,
            };
            let line = serde_json::to_string(&event)
                .map_err(|source| AcceptError::EncodeRecord { path, source })?;
            println!("{}", line);
        } else {
            println!("{}  {}", fingerprint, path.display());
        }
    }
    Ok(0)
}

/// Expands the argument list: files pass through, directories are walked
/// recursively. The result is sorted for deterministic output.
fn collect_files(paths: &[PathBuf], ext: Option<&str>) -> Result<Vec<PathBuf>, AcceptError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_directory(path, ext, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_directory(
    root: &Path,
    ext: Option<&str>,
    files: &mut Vec<PathBuf>,
) -> Result<(), AcceptError> {
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|error| AcceptError::Read {
            path: root.to_path_buf(),
            source: error.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !matches_extension(path, ext) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    Ok(())
}

/// Returns true if `path` passes the optional extension filter.
fn matches_extension(path: &Path, ext: Option<&str>) -> bool {
    let Some(want) = ext else {
        return true;
    };
    path.extension().is_some_and(|e| e == want)
}
