//! Palimpsest: snapshot acceptance for embedded examples.
//!
//! Failures stream into an [`AcceptSession`] while a host runner executes
//! embedded examples; a final pass splices the captured output back into
//! the source files, guarded by content fingerprints taken at collection
//! time.

pub use crate::error::AcceptError;
pub use crate::fingerprint::Fingerprint;
pub use crate::record::{FailureObserved, FailureRecord, SessionEvent};
pub use crate::session::{
    AcceptSession, FileOutcome, FileReport, SessionObserver, SessionSummary, SummaryCounts,
    WritePolicy, COPY_SUFFIX,
};
pub use crate::staleness::WriteDecision;

pub mod cli;
pub mod error;
pub mod fingerprint;
pub mod format;
pub mod record;
pub mod redact;
pub mod rewrite;
pub mod session;
pub mod staleness;
