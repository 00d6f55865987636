//! Core data types for the MiniStudio sequence orchestrator.
//!
//! This crate provides the value types that flow through a shot sequence:
//! the world state and its overlays, shot specifications, compiled
//! provider-agnostic requests, continuity payloads, and per-shot results.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attribute;
mod continuity;
mod delta;
mod request;
mod result;
mod shot;
mod world;

pub use attribute::{AttributeMap, AttributeValue, Color};
pub use continuity::ContinuityPayload;
pub use delta::{EntityPatch, EntityRename, StateDelta};
pub use request::{CompiledRequest, CompiledRequestBuilder, CompiledRequestBuilderError, ContinuityHint};
pub use result::{GenerationResult, ProviderAttempt, ShotError};
pub use shot::{ShotSpec, ShotSpecBuilder, ShotSpecBuilderError};
pub use world::{Entity, WorldState};
