//! Continuity carried between successful shots.

use ministudio_core::{ContinuityPayload, GenerationResult};
use tracing::debug;

/// Continuity payload of the most recent successful shot.
///
/// Failed results never touch the tracker, so continuity always resumes from
/// the last success.
///
/// # Examples
///
/// ```
/// use ministudio_core::{ContinuityPayload, GenerationResult, ShotError};
/// use ministudio_sequence::ContinuityTracker;
/// use std::time::Duration;
///
/// let mut tracker = ContinuityTracker::new();
/// tracker.record(&GenerationResult::success(ContinuityPayload::new(0, "mock", "mock://a"), Duration::ZERO));
/// tracker.record(&GenerationResult::failure(1, ShotError::Compilation("bad".into()), Duration::ZERO));
///
/// assert_eq!(tracker.last().map(|p| p.output_ref().as_str()), Some("mock://a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContinuityTracker {
    last: Option<ContinuityPayload>,
}

impl ContinuityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a result's payload if the result succeeded.
    ///
    /// Returns true if the tracker changed.
    pub fn record(&mut self, result: &GenerationResult) -> bool {
        let Some(payload) = result.continuity().filter(|_| result.is_success()) else {
            debug!(shot = result.shot_index(), "Continuity unchanged after failed shot");
            return false;
        };
        self.last = Some(payload.clone());
        true
    }

    /// Payload of the most recent successful shot.
    pub fn last(&self) -> Option<&ContinuityPayload> {
        self.last.as_ref()
    }

    /// True if no shot has succeeded yet.
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ministudio_core::ShotError;
    use std::time::Duration;

    fn success(shot: usize, output: &str) -> GenerationResult {
        GenerationResult::success(ContinuityPayload::new(shot, "mock", output), Duration::ZERO)
    }

    #[test]
    fn test_latest_success_replaces_earlier() {
        let mut tracker = ContinuityTracker::new();
        assert!(tracker.is_empty());

        assert!(tracker.record(&success(0, "mock://a")));
        assert!(tracker.record(&success(1, "mock://b")));

        let last = tracker.last().unwrap();
        assert_eq!(*last.source_shot(), 1);
        assert_eq!(last.output_ref(), "mock://b");
    }

    #[test]
    fn test_failure_leaves_tracker_unchanged() {
        let mut tracker = ContinuityTracker::new();
        tracker.record(&success(0, "mock://a"));

        let failed = GenerationResult::failure(
            1,
            ShotError::ExhaustedProviders(Vec::new()),
            Duration::ZERO,
        );
        assert!(!tracker.record(&failed));
        assert_eq!(tracker.last().unwrap().output_ref(), "mock://a");
    }
}
