use crate::PaperRecord;
use crate::label::Label;

/// Outcome of asking a semantic classifier about an unresolved document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// No answer yet; the document waits for review.
    Pending,
    /// The fallback proposed a label.
    Resolved(Label),
}

/// Escalation target for documents the deterministic rules leave at `ERROR`.
///
/// The classifier only wires the call; a model-backed implementation can be
/// swapped in without touching the step ordering.
pub trait SemanticFallback: Send + Sync {
    fn name(&self) -> &str;

    fn resolve(&self, paper: &PaperRecord) -> FallbackOutcome;
}

/// Default fallback: records a pending placeholder and never resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingFallback;

impl SemanticFallback for PendingFallback {
    fn name(&self) -> &str {
        "pending"
    }

    fn resolve(&self, _paper: &PaperRecord) -> FallbackOutcome {
        FallbackOutcome::Pending
    }
}
