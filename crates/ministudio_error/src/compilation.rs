//! Shot compilation errors.

/// Malformed shot conditions detected before a request is built.
///
/// A compilation failure fails only the shot it belongs to. It is never
/// retried and never reaches a provider.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum CompilationErrorKind {
    /// Action text is empty or whitespace
    #[display("Shot action text cannot be empty")]
    EmptyActionText,
    /// Duration is zero, negative, or not a finite number
    #[display("Shot duration must be a positive number of seconds, got {}", _0)]
    InvalidDuration(f64),
    /// The shot's state delta could not be applied
    #[display("State delta rejected: {}", _0)]
    StateDelta(String),
    /// Request assembly failed after validation
    #[display("Failed to assemble request: {}", _0)]
    Assembly(String),
}

/// Compilation error with location tracking.
///
/// # Examples
///
/// ```
/// use ministudio_error::{CompilationError, CompilationErrorKind};
///
/// let err = CompilationError::new(CompilationErrorKind::InvalidDuration(-1.0));
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Compilation Error: {} at line {} in {}", kind, line, file)]
pub struct CompilationError {
    /// The specific error condition
    pub kind: CompilationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CompilationError {
    /// Create a new CompilationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompilationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
