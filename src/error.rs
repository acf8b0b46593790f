//! Unified error type for the acceptance pipeline.
//!
//! Every failure mode carries a namespaced diagnostic code so terminal
//! output and regression tests can match on stable `palimpsest::...`
//! identifiers instead of message text. Errors are per-file: the session
//! collects them into its summary rather than aborting the run.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum AcceptError {
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(palimpsest::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(palimpsest::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    #[diagnostic(
        code(palimpsest::encoding::not_utf8),
        help("only UTF-8 source files can be rewritten")
    )]
    NotUtf8 { path: PathBuf },

    #[error("failure regions out of order: line {second} reported after line {first}")]
    #[diagnostic(code(palimpsest::rewrite::out_of_order))]
    RegionsOutOfOrder { first: usize, second: usize },

    #[error("failure regions overlap at line {line}")]
    #[diagnostic(
        code(palimpsest::rewrite::overlap),
        help("each expected-output block can be replaced at most once per run")
    )]
    RegionsOverlap { line: usize },

    #[error("failure region at line {start} extends past the end of the file ({line_count} lines)")]
    #[diagnostic(
        code(palimpsest::rewrite::bounds),
        help("the recorded line positions do not fit this file; was it truncated mid-run?")
    )]
    RegionOutOfBounds { start: usize, line_count: usize },

    #[error("malformed session record on line {line}")]
    #[diagnostic(
        code(palimpsest::records::malformed),
        help("every record line must be a JSON `collect` or `failure` event")
    )]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode session record for {}", path.display())]
    #[diagnostic(code(palimpsest::records::encode))]
    EncodeRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
