//! Provider registry errors.

/// Specific error conditions for provider registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// A run was started with no providers registered
    #[display("No providers registered")]
    NoProviders,
    /// A provider with this name is already registered
    #[display("Provider '{}' is already registered", _0)]
    DuplicateProvider(String),
    /// No provider with this name is registered
    #[display("Provider '{}' is not registered", _0)]
    UnknownProvider(String),
    /// Provider declared limits that can never be satisfied
    #[display("Provider '{}' declares invalid limits: {}", provider, reason)]
    InvalidLimits {
        /// Provider name
        provider: String,
        /// Why the limits are invalid
        reason: String,
    },
}

/// Gateway error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The specific error condition
    pub kind: GatewayErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new gateway error with caller location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
