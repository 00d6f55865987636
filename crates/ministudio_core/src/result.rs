//! Per-shot generation outcomes.

use crate::ContinuityPayload;
use ministudio_error::FailureClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One provider's part in a failed dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProviderAttempt {
    /// Provider name
    provider: String,
    /// Calls made to this provider (zero when it was skipped as incompatible)
    attempts: u32,
    /// Class of the last failure
    class: FailureClass,
    /// Last failure message
    message: String,
}

impl ProviderAttempt {
    /// Record a provider's final failure.
    pub fn new(
        provider: impl Into<String>,
        attempts: u32,
        class: FailureClass,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            attempts,
            class,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} after {} attempt(s)): {}",
            self.provider, self.class, self.attempts, self.message
        )
    }
}

/// Why a shot produced no output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ShotError {
    /// The shot was malformed or its delta was rejected; no provider was called
    Compilation(String),
    /// Every provider failed; one entry per provider in the order tried
    ExhaustedProviders(Vec<ProviderAttempt>),
}

impl fmt::Display for ShotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotError::Compilation(message) => write!(f, "Compilation failed: {}", message),
            ShotError::ExhaustedProviders(attempts) if attempts.is_empty() => {
                write!(f, "No providers available")
            }
            ShotError::ExhaustedProviders(attempts) => {
                write!(f, "All providers failed: ")?;
                for (i, attempt) in attempts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", attempt)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ShotError {}

/// Outcome of one shot.
///
/// A successful result always carries an output reference, the provider that
/// produced it, and the continuity payload derived from it. A failed result
/// always carries a [`ShotError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    shot_index: usize,
    success: bool,
    output_ref: Option<String>,
    provider_name: Option<String>,
    error: Option<ShotError>,
    duration_taken: Duration,
    continuity: Option<ContinuityPayload>,
    #[serde(default)]
    failed_attempts: Vec<ProviderAttempt>,
}

impl GenerationResult {
    /// A successful result built from the continuity payload of its output.
    pub fn success(payload: ContinuityPayload, duration_taken: Duration) -> Self {
        Self {
            shot_index: *payload.source_shot(),
            success: true,
            output_ref: Some(payload.output_ref().clone()),
            provider_name: Some(payload.provider_name().clone()),
            error: None,
            duration_taken,
            continuity: Some(payload),
            failed_attempts: Vec::new(),
        }
    }

    /// A failed result.
    pub fn failure(shot_index: usize, error: ShotError, duration_taken: Duration) -> Self {
        let failed_attempts = match &error {
            ShotError::ExhaustedProviders(attempts) => attempts.clone(),
            _ => Vec::new(),
        };
        Self {
            shot_index,
            success: false,
            output_ref: None,
            provider_name: None,
            error: Some(error),
            duration_taken,
            continuity: None,
            failed_attempts,
        }
    }

    /// Builder method to record providers that failed before a success.
    pub fn with_failed_attempts(mut self, attempts: Vec<ProviderAttempt>) -> Self {
        self.failed_attempts = attempts;
        self
    }

    /// Position of the shot in its sequence.
    pub fn shot_index(&self) -> usize {
        self.shot_index
    }

    /// True if the shot produced output.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Reference to the generated output.
    pub fn output_ref(&self) -> Option<&str> {
        self.output_ref.as_deref()
    }

    /// Provider that produced the output.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider_name.as_deref()
    }

    /// Failure reason.
    pub fn error(&self) -> Option<&ShotError> {
        self.error.as_ref()
    }

    /// Wall time spent on the shot.
    pub fn duration_taken(&self) -> Duration {
        self.duration_taken
    }

    /// Continuity payload for later shots; present only on success.
    pub fn continuity(&self) -> Option<&ContinuityPayload> {
        self.continuity.as_ref()
    }

    /// Providers that failed while handling this shot, in the order tried.
    pub fn failed_attempts(&self) -> &[ProviderAttempt] {
        &self.failed_attempts
    }
}
