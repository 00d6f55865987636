//! Error types for the MiniStudio orchestrator.
//!
//! This crate provides the foundation error types used throughout the MiniStudio workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Per-shot failures (bad shot specs, exhausted providers) are not raised through
//! these types at the orchestrator boundary; they are recorded on the shot's
//! result instead. `StudioError` is reserved for rejected calls and setup errors.
//!
//! # Examples
//!
//! ```
//! use ministudio_error::{SequenceError, SequenceErrorKind, StudioResult};
//!
//! fn run() -> StudioResult<()> {
//!     Err(SequenceError::new(SequenceErrorKind::EmptyShotList))?
//! }
//!
//! assert!(run().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compilation;
mod config;
mod error;
mod gateway;
mod provider;
mod sequence;
mod state;

pub use compilation::{CompilationError, CompilationErrorKind};
pub use config::ConfigError;
pub use error::{StudioError, StudioErrorKind, StudioResult};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use provider::{FailureClass, ProviderError, ProviderErrorKind, ProviderResult, RetryableError};
pub use sequence::{SequenceError, SequenceErrorKind};
pub use state::{StateError, StateErrorKind};
