//! Provider-agnostic compiled requests.

use crate::ContinuityPayload;
use serde::{Deserialize, Serialize};

/// Whether and how continuity is attached to a request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "snake_case")]
pub enum ContinuityHint {
    /// The shot did not ask for continuity
    #[default]
    NotRequested,
    /// Continuity from an earlier successful shot
    Attached(ContinuityPayload),
    /// Continuity was requested but nothing earlier had succeeded
    Degraded,
}

/// A fully resolved request ready for any provider.
///
/// Compiling the same inputs always yields an equal request, so requests can
/// be compared and serialized for reproducibility checks.
///
/// # Examples
///
/// ```
/// use ministudio_core::{CompiledRequestBuilder, ContinuityHint};
///
/// let request = CompiledRequestBuilder::default()
///     .shot_index(0usize)
///     .prompt("An orb glows")
///     .negative_prompt("blurry")
///     .duration(12.0)
///     .aspect_ratio("16:9")
///     .build()
///     .unwrap();
///
/// let clamped = request.clamped_to(8.0);
/// assert_eq!(*clamped.duration(), 8.0);
/// assert!(*clamped.duration_clamped());
/// assert_eq!(*request.continuity(), ContinuityHint::NotRequested);
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
pub struct CompiledRequest {
    /// Position of the shot in its sequence
    shot_index: usize,
    /// Positive prompt text
    prompt: String,
    /// Negative prompt text
    negative_prompt: String,
    /// Duration in seconds, possibly clamped for a provider
    duration: f64,
    /// Aspect ratio such as `16:9`
    aspect_ratio: String,
    /// Seed for reproducible generation
    #[builder(default)]
    seed: Option<u64>,
    /// Continuity attached to this request
    #[builder(default)]
    continuity: ContinuityHint,
    /// True when `duration` was reduced to fit a provider
    #[builder(default)]
    duration_clamped: bool,
}

impl CompiledRequest {
    /// The attached continuity payload, if any.
    pub fn continuity_payload(&self) -> Option<&ContinuityPayload> {
        match &self.continuity {
            ContinuityHint::Attached(payload) => Some(payload),
            _ => None,
        }
    }

    /// True if continuity was requested but could not be supplied.
    pub fn is_continuity_degraded(&self) -> bool {
        matches!(self.continuity, ContinuityHint::Degraded)
    }

    /// Returns a copy whose duration does not exceed `max_duration`.
    ///
    /// The clamp is recorded on the copy. A request already within the limit
    /// is returned unchanged.
    pub fn clamped_to(&self, max_duration: f64) -> CompiledRequest {
        let mut request = self.clone();
        if max_duration > 0.0 && request.duration > max_duration {
            request.duration = max_duration;
            request.duration_clamped = true;
        }
        request
    }
}
