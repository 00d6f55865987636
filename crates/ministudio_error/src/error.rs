//! Top-level error wrapper types.

use crate::{
    CompilationError, ConfigError, GatewayError, ProviderError, SequenceError, StateError,
};

/// Every error family the workspace can surface through `StudioResult`.
///
/// # Examples
///
/// ```
/// use ministudio_error::{ConfigError, StudioError};
///
/// let err: StudioError = ConfigError::new("missing retry section").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StudioErrorKind {
    /// World state overlay error
    #[from(StateError)]
    State(StateError),
    /// Shot compilation error
    #[from(CompilationError)]
    Compilation(CompilationError),
    /// Provider failure
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Provider registry error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Sequence precondition violation
    #[from(SequenceError)]
    Sequence(SequenceError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// MiniStudio error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("MiniStudio Error: {}", _0)]
pub struct StudioError(Box<StudioErrorKind>);

impl StudioError {
    /// Create a new error from a kind.
    pub fn new(kind: StudioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StudioErrorKind {
        &self.0
    }
}

impl<T> From<T> for StudioError
where
    T: Into<StudioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for MiniStudio operations.
pub type StudioResult<T> = std::result::Result<T, StudioError>;
