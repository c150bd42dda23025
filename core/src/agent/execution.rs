//! Agent execution result structures

use serde::{Deserialize, Serialize};

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The model replied without requesting tools
    Answered,

    /// Every round requested tools and the bound was hit
    MaxRoundsExceeded,
}

/// Result of one user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecution {
    /// Text handed back to the user
    pub final_result: String,

    /// Number of model rounds used
    pub rounds: usize,

    pub outcome: ExecutionOutcome,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl AgentExecution {
    pub fn answered(final_result: String, rounds: usize, duration_ms: u64) -> Self {
        Self {
            final_result,
            rounds,
            outcome: ExecutionOutcome::Answered,
            duration_ms,
        }
    }

    pub fn exhausted(final_result: String, rounds: usize, duration_ms: u64) -> Self {
        Self {
            final_result,
            rounds,
            outcome: ExecutionOutcome::MaxRoundsExceeded,
            duration_ms,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.outcome == ExecutionOutcome::Answered
    }
}
