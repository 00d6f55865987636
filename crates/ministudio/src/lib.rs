//! MiniStudio - Sequential Continuity Orchestrator
//!
//! MiniStudio turns an ordered list of shots into an ordered list of
//! generated video clips while keeping characters and settings consistent
//! from one shot to the next.
//!
//! # Features
//!
//! - **Explicit world state**: entities and environment are passed by value and
//!   evolved with per-shot deltas
//! - **Deterministic prompts**: the same state and shot always compile to the
//!   same request
//! - **Continuity chaining**: each shot can reference the last successful output
//! - **Provider fallback**: priority-ordered providers with retry and backoff
//! - **Layered configuration**: bundled defaults, user and project overrides
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ministudio::{Entity, MockVideoProvider, ShotSpec, StateDelta, Studio, WorldState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     ministudio::init_observability()?;
//!
//!     let studio = Studio::from_default_config()?
//!         .with_provider(Arc::new(MockVideoProvider::new()), 0);
//!
//!     let state = WorldState::new()
//!         .with_entity("Orb", Entity::new().with_attribute("color", "gold"))?;
//!     let shots = vec![
//!         ShotSpec::new("The orb drifts into the library", 5.0),
//!         ShotSpec::new("The orb begins to glow", 5.0)
//!             .with_delta(StateDelta::new().set("Orb", "glow", "bright"))
//!             .requiring_continuity(),
//!     ];
//!
//!     let run = studio.run(state, &shots).await?;
//!     for output in run.outputs() {
//!         println!("{}", output);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;
mod studio;

pub use config::{GatewaySettings, ProviderOverride, StudioConfig};
pub use observability::{
    ObservabilityConfig, init_observability, init_observability_with_config,
    shutdown_observability,
};
pub use studio::Studio;

pub use ministudio_core::*;
pub use ministudio_error::*;
pub use ministudio_gateway::*;
pub use ministudio_interface::*;
pub use ministudio_providers::*;
pub use ministudio_sequence::*;
