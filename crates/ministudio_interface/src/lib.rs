//! Trait definitions for MiniStudio video providers.
//!
//! This crate provides the [`VideoProvider`] trait every generation backend
//! implements, plus the output and health types exchanged with the gateway.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::VideoProvider;
pub use types::{ProviderMetrics, ProviderOutput, ProviderStatus};
