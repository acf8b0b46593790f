//! Session events and per-file failure records.
//!
//! A host runner reports two kinds of events while examples execute: a
//! `collect` event when a file enters the run and a `failure` event for each
//! expected/actual mismatch. Serialized one-per-line as JSON, these make up
//! the session record stream that `apply` replays after the fact.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// One mismatch between recorded and actual output, as observed by the host
/// runner.
///
/// Line fields use the 0-based numbering the runner sees:
/// `declaration_line` is where the example's enclosing definition starts,
/// `example_line` is the example's offset within that definition, and
/// `source_line_count` is how many source lines the example's invocation
/// occupies. Their sum addresses the first line of the recorded
/// expected-output block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureObserved {
    pub path: PathBuf,
    pub declaration_line: usize,
    pub example_line: usize,
    pub source_line_count: usize,
    pub expected_line_count: usize,
    pub actual_output: String,
}

impl FailureObserved {
    /// 0-based line where the expected-output block begins.
    ///
    /// The offsets arrive from an external record stream, so the sum
    /// saturates; a saturated position fits no file and fails region
    /// validation instead of wrapping.
    pub fn start_line(&self) -> usize {
        self.declaration_line
            .saturating_add(self.example_line)
            .saturating_add(self.source_line_count)
    }
}

/// A [`FailureObserved`] reduced to what the rewriter needs. Records live in
/// a per-file collection, so the path stays in the map key rather than here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub start_line: usize,
    pub expected_line_count: usize,
    pub actual_output: String,
}

impl From<FailureObserved> for FailureRecord {
    fn from(event: FailureObserved) -> Self {
        FailureRecord {
            start_line: event.start_line(),
            expected_line_count: event.expected_line_count,
            actual_output: event.actual_output,
        }
    }
}

/// One line of the session record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A file entered the run; `fingerprint` digests the bytes the runner
    /// saw at that moment.
    Collect {
        path: PathBuf,
        fingerprint: Fingerprint,
    },
    /// An example produced output that does not match its recorded
    /// expectation.
    Failure(FailureObserved),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(path: &str) -> FailureObserved {
        FailureObserved {
            path: PathBuf::from(path),
            declaration_line: 10,
            example_line: 2,
            source_line_count: 1,
            expected_line_count: 3,
            actual_output: "new output\n".to_string(),
        }
    }

    #[test]
    fn start_line_sums_the_three_offsets() {
        assert_eq!(failure("a.py").start_line(), 13);
    }

    #[test]
    fn start_line_saturates_instead_of_wrapping() {
        let mut event = failure("a.py");
        event.declaration_line = usize::MAX;
        assert_eq!(event.start_line(), usize::MAX);
    }

    #[test]
    fn record_keeps_region_and_output_only() {
        let record = FailureRecord::from(failure("a.py"));
        assert_eq!(record.start_line, 13);
        assert_eq!(record.expected_line_count, 3);
        assert_eq!(record.actual_output, "new output\n");
    }

    #[test]
    fn failure_events_round_trip_as_tagged_json() {
        let event = SessionEvent::Failure(failure("src/demo.py"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"failure\""));
        assert!(json.contains("\"declaration_line\":10"));
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn collect_events_parse_from_hand_written_json() {
        let line = format!(
            "{{\"type\":\"collect\",\"path\":\"a.py\",\"fingerprint\":\"{}\"}}",
            Fingerprint::of_bytes(b"content")
        );
        let event: SessionEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(
            event,
            SessionEvent::Collect {
                path: PathBuf::from("a.py"),
                fingerprint: Fingerprint::of_bytes(b"content"),
            }
        );
    }

    #[test]
    fn unknown_event_types_are_rejected() {
        let line = r#"{"type":"teardown","path":"a.py"}"#;
        assert!(serde_json::from_str::<SessionEvent>(line).is_err());
    }
}
