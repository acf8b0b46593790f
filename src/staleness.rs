//! Write-safety decisions for files with pending rewrites.

use crate::fingerprint::Fingerprint;

/// What may be done with a file whose examples produced failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Overwrite the original file in place.
    Write,
    /// Write a sibling copy and leave the original alone.
    WriteCopy,
    /// The file changed after collection; overwriting would destroy edits.
    SkipChanged,
    /// The file was never fingerprinted at collection time.
    SkipUntracked,
}

/// Decides whether rewritten content may be persisted for one file.
///
/// Copy mode never touches the original, so staleness is irrelevant there.
/// Otherwise a missing collection-time fingerprint yields `SkipUntracked`
/// and a mismatched one yields `SkipChanged`; the caller decides how hard
/// to treat `SkipUntracked`.
pub fn decide_write(
    copy_mode: bool,
    at_start: Option<&Fingerprint>,
    current: &Fingerprint,
) -> WriteDecision {
    if copy_mode {
        return WriteDecision::WriteCopy;
    }
    let Some(recorded) = at_start else {
        return WriteDecision::SkipUntracked;
    };
    if recorded != current {
        return WriteDecision::SkipChanged;
    }
    WriteDecision::Write
}
