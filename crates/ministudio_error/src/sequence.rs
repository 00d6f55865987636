//! Sequence-level contract violations.

/// Conditions that reject a run before any shot starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SequenceErrorKind {
    /// The caller supplied no shots
    #[display("Shot list cannot be empty")]
    EmptyShotList,
}

/// Sequence error with location tracking.
///
/// # Examples
///
/// ```
/// use ministudio_error::{SequenceError, SequenceErrorKind};
///
/// let err = SequenceError::new(SequenceErrorKind::EmptyShotList);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sequence Error: {} at line {} in {}", kind, line, file)]
pub struct SequenceError {
    /// The specific error condition
    pub kind: SequenceErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SequenceError {
    /// Create a new SequenceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SequenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
