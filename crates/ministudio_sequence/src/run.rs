//! The outcome of one sequence run.

use crate::SequenceStatus;
use chrono::{DateTime, Utc};
use ministudio_core::{CompiledRequest, GenerationResult, WorldState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything a caller needs to see what happened in a run.
///
/// `results`, `requests` and `state_history` have one entry per shot that
/// was processed, in shot order. A halted or cancelled run holds fewer
/// entries than shots supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SequenceRunResult {
    /// Unique id for this run
    pub(crate) run_id: Uuid,
    /// Per-shot outcomes
    pub(crate) results: Vec<GenerationResult>,
    /// Compiled request per shot, `None` when compilation failed
    pub(crate) requests: Vec<Option<CompiledRequest>>,
    /// World state each shot was compiled against
    pub(crate) state_history: Vec<WorldState>,
    /// World state after the last processed shot
    pub(crate) final_state: WorldState,
    /// Terminal status
    pub(crate) final_status: SequenceStatus,
    /// When the run started
    pub(crate) started_at: DateTime<Utc>,
    /// When the run finished
    pub(crate) finished_at: DateTime<Utc>,
}

impl SequenceRunResult {
    /// True if the run processed every shot.
    pub fn is_completed(&self) -> bool {
        self.final_status == SequenceStatus::Completed
    }

    /// Indices of shots that produced no output.
    pub fn failed_shots(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.shot_index())
            .collect()
    }

    /// Number of shots that produced output.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Output references of successful shots, in shot order.
    pub fn outputs(&self) -> Vec<&str> {
        self.results.iter().filter_map(|r| r.output_ref()).collect()
    }
}
