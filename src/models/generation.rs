use serde::{Deserialize, Serialize};

/// What came back for one chunk. Every chunk produces exactly one of these,
/// success or not; a failed chunk never aborts the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GenerationOutcome {
    Success { text: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    /// Index of the chunk this result belongs to; merge order is defined by
    /// this, never by completion order.
    pub chunk_index: usize,
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    pub fn success(chunk_index: usize, text: String) -> Self {
        Self {
            chunk_index,
            outcome: GenerationOutcome::Success { text },
        }
    }

    pub fn failed(chunk_index: usize, error: String) -> Self {
        Self {
            chunk_index,
            outcome: GenerationOutcome::Failed { error },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Success { .. })
    }
}
