//! World state overlay errors.

/// Specific error conditions when building or overlaying a world state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StateErrorKind {
    /// Entity name is empty or whitespace
    #[display("Entity name cannot be empty")]
    EmptyEntityName,
    /// Attribute key is empty or whitespace
    #[display("Attribute key on '{}' cannot be empty", _0)]
    EmptyAttributeKey(String),
    /// Rename references an entity that does not exist
    #[display("Cannot rename unknown entity '{}'", _0)]
    UnknownEntity(String),
    /// Rename target is already taken
    #[display("Cannot rename onto existing entity '{}'", _0)]
    EntityExists(String),
}

/// World state error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("State Error: {} at line {} in {}", kind, line, file)]
pub struct StateError {
    /// The specific error condition
    pub kind: StateErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StateError {
    /// Create a new StateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
