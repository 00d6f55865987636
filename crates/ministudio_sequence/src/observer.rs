//! Progress hooks for a running sequence.

use crate::{SequenceRunResult, ShotPhase};
use ministudio_core::GenerationResult;

/// Receives progress notifications from a [`SequenceOrchestrator`](crate::SequenceOrchestrator).
///
/// Every hook has a no-op default. Hooks are called inline on the run's task
/// and should return quickly.
pub trait SequenceObserver: Send + Sync {
    /// A shot entered a new phase.
    fn on_phase(&self, _shot_index: usize, _phase: ShotPhase) {}

    /// A shot's result was appended to the run.
    fn on_shot_recorded(&self, _result: &GenerationResult) {}

    /// The run reached a terminal status.
    fn on_run_finished(&self, _result: &SequenceRunResult) {}
}
