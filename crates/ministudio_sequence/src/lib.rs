//! Shot sequencing for the MiniStudio orchestrator.
//!
//! - [`PromptCompiler`] turns a world state and a shot into a [`CompiledRequest`](ministudio_core::CompiledRequest)
//! - [`ContinuityTracker`] carries the most recent successful output forward
//! - [`SequenceOrchestrator`] drives an ordered shot list through a
//!   [`ProviderGateway`](ministudio_gateway::ProviderGateway), one shot at a time
//!
//! Shots in one sequence never run concurrently. Each shot moves through
//! [`ShotPhase::Pending`], [`ShotPhase::Compiling`], [`ShotPhase::Dispatching`]
//! and [`ShotPhase::Recorded`] before the next one starts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compiler;
mod config;
mod observer;
mod orchestrator;
mod policy;
mod run;
mod tracker;

pub use compiler::{DEFAULT_STYLE_EXCLUSIONS, PromptCompiler};
pub use config::{CompilerConfig, SequenceConfig};
pub use observer::SequenceObserver;
pub use orchestrator::SequenceOrchestrator;
pub use policy::{FailurePolicy, SequenceStatus, ShotPhase};
pub use run::SequenceRunResult;
pub use tracker::ContinuityTracker;
