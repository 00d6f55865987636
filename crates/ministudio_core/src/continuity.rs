//! Continuity payloads carried from one successful shot to the next.

use serde::{Deserialize, Serialize};

/// What a later shot needs to visually continue from an earlier one.
///
/// Produced from a successful generation and never from a failed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ContinuityPayload {
    /// Index of the shot that produced this payload
    source_shot: usize,
    /// Provider that generated the source output
    provider_name: String,
    /// Opaque reference to the source output
    output_ref: String,
    /// Reference to the last frame, when the provider exposes one
    trailing_frame: Option<String>,
    /// Seed used to generate the source output
    seed: Option<u64>,
    /// Provider-specific token for native continuation
    token: Option<String>,
}

impl ContinuityPayload {
    /// Creates a payload from a source shot and its output reference.
    pub fn new(
        source_shot: usize,
        provider_name: impl Into<String>,
        output_ref: impl Into<String>,
    ) -> Self {
        Self {
            source_shot,
            provider_name: provider_name.into(),
            output_ref: output_ref.into(),
            trailing_frame: None,
            seed: None,
            token: None,
        }
    }

    /// Builder method to set the trailing frame reference.
    pub fn with_trailing_frame(mut self, frame: Option<String>) -> Self {
        self.trailing_frame = frame;
        self
    }

    /// Builder method to set the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the native continuation token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Prompt fragment describing where the next shot picks up.
    ///
    /// # Examples
    ///
    /// ```
    /// use ministudio_core::ContinuityPayload;
    ///
    /// let payload = ContinuityPayload::new(0, "mock", "mock://abc")
    ///     .with_trailing_frame(Some("mock://abc#last".to_string()));
    ///
    /// assert_eq!(
    ///     payload.descriptor(),
    ///     "[CONTINUITY: continue from shot 0 output mock://abc, last frame mock://abc#last]"
    /// );
    /// ```
    pub fn descriptor(&self) -> String {
        match &self.trailing_frame {
            Some(frame) => format!(
                "[CONTINUITY: continue from shot {} output {}, last frame {}]",
                self.source_shot, self.output_ref, frame
            ),
            None => format!(
                "[CONTINUITY: continue from shot {} output {}]",
                self.source_shot, self.output_ref
            ),
        }
    }
}
