//! Provider failure types and retry classification.

use serde::{Deserialize, Serialize};

/// How the gateway must react to a provider failure.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FailureClass {
    /// Retry the same provider with backoff before falling through
    Transient,
    /// Skip retries and fall through to the next provider immediately
    Permanent,
}

/// Provider-reported failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Provider refused the call because of quota or request rate
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Call did not complete within the allotted time
    #[display("Timed out after {} ms", _0)]
    Timeout(u128),
    /// Transport-level failure
    #[display("Network error: {}", _0)]
    Network(String),
    /// Provider is temporarily overloaded or down
    #[display("Service unavailable: {}", _0)]
    Unavailable(String),
    /// Request is malformed for this provider
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Requested duration cannot be produced by this provider
    #[display("Unsupported duration: {}", _0)]
    UnsupportedDuration(String),
    /// Requested aspect ratio cannot be produced by this provider
    #[display("Unsupported aspect ratio '{}'", _0)]
    UnsupportedAspectRatio(String),
    /// Provider's content policy rejected the prompt
    #[display("Content rejected: {}", _0)]
    ContentRejected(String),
    /// Any other provider-side failure, treated as permanent
    #[display("Provider failure: {}", _0)]
    Other(String),
}

impl ProviderErrorKind {
    /// Classify this failure for the retry policy.
    pub fn class(&self) -> FailureClass {
        match self {
            ProviderErrorKind::RateLimited(_)
            | ProviderErrorKind::Timeout(_)
            | ProviderErrorKind::Network(_)
            | ProviderErrorKind::Unavailable(_) => FailureClass::Transient,
            ProviderErrorKind::InvalidRequest(_)
            | ProviderErrorKind::UnsupportedDuration(_)
            | ProviderErrorKind::UnsupportedAspectRatio(_)
            | ProviderErrorKind::ContentRejected(_)
            | ProviderErrorKind::Other(_) => FailureClass::Permanent,
        }
    }
}

/// Provider failure with source location tracking.
///
/// # Examples
///
/// ```
/// use ministudio_error::{FailureClass, ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::RateLimited("429".to_string()));
/// assert!(err.is_retryable());
/// assert_eq!(err.class(), FailureClass::Transient);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of failure
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Failure class of the underlying kind.
    pub fn class(&self) -> FailureClass {
        self.kind.class()
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like rate limits or timeouts should return true.
/// Permanent errors like an unsupported aspect ratio should return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Transient
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;
