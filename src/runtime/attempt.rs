use std::fmt;
use tracing::info;
use uuid::Uuid;
use crate::dsl::WorkflowDocument;
use crate::error::GenerationError;

/// Monotonically increasing attempt identity; the highest started one is live.
pub type AttemptSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    FetchingCatalog,
    Interpreting,
    Submitting,
    Completed,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttemptState::Idle => "idle",
            AttemptState::FetchingCatalog => "fetching_catalog",
            AttemptState::Interpreting => "interpreting",
            AttemptState::Submitting => "submitting",
            AttemptState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// One run of the pipeline for a single prompt snapshot.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub seq: AttemptSeq,
    /// Correlates log lines of this attempt across services.
    pub trace_id: Uuid,
    pub prompt: String,
    state: AttemptState,
}

impl Attempt {
    pub fn new(seq: AttemptSeq, prompt: &str) -> Self {
        Self {
            seq,
            trace_id: Uuid::new_v4(),
            prompt: prompt.to_string(),
            state: AttemptState::Idle,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn transition(&mut self, next: AttemptState) {
        info!(attempt = self.seq, trace_id = %self.trace_id, from = %self.state, to = %next, "Attempt state change");
        self.state = next;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success { document: WorkflowDocument },
    Failure { error: GenerationError },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn document(&self) -> Option<&WorkflowDocument> {
        match self {
            GenerationResult::Success { document } => Some(document),
            GenerationResult::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            GenerationResult::Success { .. } => None,
            GenerationResult::Failure { error } => Some(error.to_string()),
        }
    }
}

impl From<crate::error::Result<WorkflowDocument>> for GenerationResult {
    fn from(result: crate::error::Result<WorkflowDocument>) -> Self {
        match result {
            Ok(document) => GenerationResult::Success { document },
            Err(error) => GenerationResult::Failure { error },
        }
    }
}
