//! Offline video providers for MiniStudio.
//!
//! - [`MockVideoProvider`] returns deterministic content-addressed outputs
//!   and is the default backend for dry runs.
//! - [`ScriptedProvider`] plays back a script of successes and failures and
//!   records every request it sees, for exercising retry and fallback.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mock;
mod scripted;

pub use mock::MockVideoProvider;
pub use scripted::{ScriptedProvider, ScriptedResponse};

/// Aspect ratios most video models accept.
pub const COMMON_ASPECT_RATIOS: [&str; 3] = ["16:9", "9:16", "1:1"];
