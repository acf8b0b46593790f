//! Session state and the end-of-run rewrite pass.
//!
//! # Architecture
//!
//! An [`AcceptSession`] lives exactly as long as one test run:
//!
//! 1. **Collection**: the host reports each file it observes together with
//!    a fingerprint of the bytes it saw ([`SessionObserver::file_collected`]).
//! 2. **Execution**: every expected/actual mismatch arrives as a
//!    [`FailureObserved`] event ([`SessionObserver::failure_observed`]).
//! 3. **Finish**: [`AcceptSession::finish`] consumes the session, groups
//!    failures by file, gates each file through the staleness check,
//!    rewrites, persists, and returns a [`SessionSummary`] of per-file
//!    outcomes.
//!
//! A problem with one file never blocks the others: every outcome,
//! including hard failures, lands in the summary instead of propagating.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AcceptError;
use crate::fingerprint::Fingerprint;
use crate::record::{FailureObserved, FailureRecord};
use crate::rewrite::rewrite_lines;
use crate::staleness::{decide_write, WriteDecision};

// ============================================================================
// POLICY AND OBSERVER INTERFACE
// ============================================================================

/// Suffix appended to the original filename in copy mode
/// (`example.py` becomes `example.py.new`).
pub const COPY_SUFFIX: &str = ".new";

/// How a session is allowed to persist rewritten content.
///
/// With neither `accept` nor `accept_copy` set the session is inert: it
/// still tracks failures but `finish` touches no files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritePolicy {
    /// Overwrite originals in place.
    pub accept: bool,
    /// Write [`COPY_SUFFIX`] siblings instead; wins over `accept` when both
    /// are set.
    pub accept_copy: bool,
    /// Skip untracked files instead of overwriting them.
    pub strict_untracked: bool,
}

impl WritePolicy {
    fn target_mode(&self) -> Option<TargetMode> {
        if self.accept_copy {
            Some(TargetMode::Copy)
        } else if self.accept {
            Some(TargetMode::InPlace)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetMode {
    InPlace,
    Copy,
}

/// Receiver for the two events a host runner emits while tests execute.
///
/// Runners that execute examples in parallel share one session behind a
/// mutex; both methods are quick appends.
pub trait SessionObserver {
    /// A file entered the run. The first observation of a path wins; later
    /// calls for the same path are ignored.
    fn file_collected(&mut self, path: &Path, fingerprint: Fingerprint);

    /// An example's actual output did not match its recorded expectation.
    fn failure_observed(&mut self, failure: FailureObserved);
}

// ============================================================================
// SESSION STATE
// ============================================================================

/// Per-file accumulation: collection-time fingerprint plus observed
/// failures.
#[derive(Debug, Default)]
struct FileState {
    fingerprint_at_start: Option<Fingerprint>,
    failures: Vec<FailureRecord>,
}

/// All state for one accept run. Owned and session-scoped; consumed by
/// [`finish`](Self::finish), so nothing survives the run.
#[derive(Debug)]
pub struct AcceptSession {
    policy: WritePolicy,
    files: BTreeMap<PathBuf, FileState>,
}

impl AcceptSession {
    pub fn new(policy: WritePolicy) -> Self {
        Self {
            policy,
            files: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// Runs the rewrite pass and reports what happened to every file that
    /// had failures.
    ///
    /// Files are processed in path order. Within a file, failures are
    /// sorted by `start_line` with a stable sort, so records at equal
    /// positions keep their observation order. Consuming `self` here means
    /// no observer can append once rewriting has begun.
    pub fn finish(self) -> SessionSummary {
        let Some(mode) = self.policy.target_mode() else {
            return self.finish_inert();
        };

        let strict = self.policy.strict_untracked;
        let mut reports = Vec::new();
        for (path, mut state) in self.files {
            if state.failures.is_empty() {
                continue;
            }
            state.failures.sort_by_key(|failure| failure.start_line);
            let outcome = process_file(&path, &state, mode, strict);
            reports.push(FileReport { path, outcome });
        }
        SessionSummary { reports }
    }

    /// No accept mode requested: report pending files without touching the
    /// filesystem.
    fn finish_inert(self) -> SessionSummary {
        let reports = self
            .files
            .into_iter()
            .filter(|(_, state)| !state.failures.is_empty())
            .map(|(path, state)| FileReport {
                path,
                outcome: FileOutcome::Pending {
                    examples: state.failures.len(),
                },
            })
            .collect();
        SessionSummary { reports }
    }
}

impl SessionObserver for AcceptSession {
    fn file_collected(&mut self, path: &Path, fingerprint: Fingerprint) {
        let state = self.files.entry(path.to_path_buf()).or_default();
        if state.fingerprint_at_start.is_none() {
            state.fingerprint_at_start = Some(fingerprint);
        }
    }

    fn failure_observed(&mut self, failure: FailureObserved) {
        let path = failure.path.clone();
        self.files.entry(path).or_default().failures.push(failure.into());
    }
}

// ============================================================================
// PER-FILE PROCESSING
// ============================================================================

fn process_file(path: &Path, state: &FileState, mode: TargetMode, strict: bool) -> FileOutcome {
    match try_process_file(path, state, mode, strict) {
        Ok(outcome) => outcome,
        Err(error) => FileOutcome::Failed { error },
    }
}

fn try_process_file(
    path: &Path,
    state: &FileState,
    mode: TargetMode,
    strict: bool,
) -> Result<FileOutcome, AcceptError> {
    // One read supplies both the staleness fingerprint and the text to
    // rewrite, so the decision and the splice see the same bytes.
    let bytes = fs::read(path).map_err(|source| AcceptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let current = Fingerprint::of_bytes(&bytes);
    let decision = decide_write(
        mode == TargetMode::Copy,
        state.fingerprint_at_start.as_ref(),
        &current,
    );

    let mut untracked = false;
    match decision {
        WriteDecision::SkipChanged => return Ok(FileOutcome::SkippedChanged),
        WriteDecision::SkipUntracked if strict => return Ok(FileOutcome::SkippedUntracked),
        WriteDecision::SkipUntracked => untracked = true,
        WriteDecision::Write | WriteDecision::WriteCopy => {}
    }

    let before = String::from_utf8(bytes).map_err(|_| AcceptError::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    let lines: Vec<&str> = before.lines().collect();
    let after = rewrite_lines(&lines, &state.failures)?;

    let target = match mode {
        TargetMode::InPlace => path.to_path_buf(),
        TargetMode::Copy => copy_target(path),
    };
    fs::write(&target, &after).map_err(|source| AcceptError::Write {
        path: target.clone(),
        source,
    })?;

    Ok(FileOutcome::Written {
        target,
        examples: state.failures.len(),
        untracked,
        before,
        after,
    })
}

/// Copy-mode sibling: the original filename with [`COPY_SUFFIX`] appended.
fn copy_target(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(COPY_SUFFIX);
    PathBuf::from(name)
}

// ============================================================================
// OUTCOMES AND SUMMARY
// ============================================================================

/// What happened to one file during [`AcceptSession::finish`].
#[derive(Debug)]
pub enum FileOutcome {
    /// Rewritten content was persisted to `target` (the original path, or
    /// its sibling copy). `before` and `after` carry the full texts for
    /// diff rendering.
    Written {
        target: PathBuf,
        examples: usize,
        /// The file had no collection-time fingerprint and was overwritten
        /// anyway (non-strict policy).
        untracked: bool,
        before: String,
        after: String,
    },
    /// Inert run: failures exist but no accept mode was requested.
    Pending { examples: usize },
    /// The file changed after collection; nothing was written.
    SkippedChanged,
    /// Strict policy and no collection-time fingerprint; nothing was
    /// written.
    SkippedUntracked,
    /// Reading, rewriting, or writing this file failed. Other files are
    /// unaffected.
    Failed { error: AcceptError },
}

/// One file's report in the session summary.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Everything [`AcceptSession::finish`] did, per file, in path order.
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub reports: Vec<FileReport>,
}

impl SessionSummary {
    pub fn counts(&self) -> SummaryCounts {
        let mut counts = SummaryCounts::default();
        for report in &self.reports {
            match report.outcome {
                FileOutcome::Written { .. } => counts.written += 1,
                FileOutcome::Pending { .. } => counts.pending += 1,
                FileOutcome::SkippedChanged | FileOutcome::SkippedUntracked => {
                    counts.skipped += 1
                }
                FileOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn any_failed(&self) -> bool {
        self.reports
            .iter()
            .any(|report| matches!(report.outcome, FileOutcome::Failed { .. }))
    }
}

/// Tally of per-file outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCounts {
    pub written: usize,
    pub pending: usize,
    pub skipped: usize,
    pub failed: usize,
}
