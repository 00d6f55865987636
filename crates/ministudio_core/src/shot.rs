//! Shot specifications.

use crate::StateDelta;
use ministudio_error::{CompilationError, CompilationErrorKind};
use serde::{Deserialize, Serialize};

/// One shot in a sequence: what happens, for how long, and what changes.
///
/// # Examples
///
/// ```
/// use ministudio_core::{ShotSpec, StateDelta};
///
/// let shot = ShotSpec::new("The orb drifts upward", 4.0)
///     .with_delta(StateDelta::new().set("Orb", "glow", "bright"))
///     .requiring_continuity();
///
/// assert!(*shot.continuity_required());
/// assert!(shot.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ShotSpec {
    /// What happens in the shot
    action_text: String,
    /// Requested duration in seconds
    duration: f64,
    /// Overlay applied to the world state before this shot
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    state_delta: Option<StateDelta>,
    /// Whether this shot should continue from the previous successful output
    #[builder(default)]
    #[serde(default)]
    continuity_required: bool,
    /// Aspect ratio override for this shot
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    aspect_ratio: Option<String>,
    /// Seed override for this shot
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    seed: Option<u64>,
}

impl ShotSpec {
    /// Creates a shot with no delta that does not require continuity.
    pub fn new(action_text: impl Into<String>, duration: f64) -> Self {
        Self {
            action_text: action_text.into(),
            duration,
            state_delta: None,
            continuity_required: false,
            aspect_ratio: None,
            seed: None,
        }
    }

    /// Builder method to attach a state delta.
    pub fn with_delta(mut self, delta: StateDelta) -> Self {
        self.state_delta = Some(delta);
        self
    }

    /// Builder method to require continuity from the previous successful shot.
    pub fn requiring_continuity(mut self) -> Self {
        self.continuity_required = true;
        self
    }

    /// Builder method to override the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    /// Builder method to pin the seed for this shot.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the shot for malformed conditions.
    ///
    /// # Errors
    ///
    /// Returns an error if the action text is blank or the duration is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), CompilationError> {
        if self.action_text.trim().is_empty() {
            return Err(CompilationError::new(CompilationErrorKind::EmptyActionText));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(CompilationError::new(CompilationErrorKind::InvalidDuration(
                self.duration,
            )));
        }
        Ok(())
    }
}
