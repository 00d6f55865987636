//! The provider trait implemented by every generation backend.

use crate::ProviderOutput;
use async_trait::async_trait;
use ministudio_core::CompiledRequest;
use ministudio_error::ProviderResult;
use std::time::Duration;

/// Core trait that all video generation backends must implement.
///
/// A provider receives requests that have already been fitted to its declared
/// limits: the duration never exceeds [`max_duration`](VideoProvider::max_duration)
/// and the aspect ratio is one of
/// [`supported_aspect_ratios`](VideoProvider::supported_aspect_ratios).
///
/// Errors must be classified through
/// [`ProviderErrorKind`](ministudio_error::ProviderErrorKind) so the gateway
/// knows whether to retry.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Generate a clip for a compiled request.
    async fn generate(&self, request: &CompiledRequest) -> ProviderResult<ProviderOutput>;

    /// Unique provider name (e.g., "veo", "mock").
    fn name(&self) -> &str;

    /// Longest clip this provider can produce, in seconds.
    fn max_duration(&self) -> f64;

    /// Aspect ratios this provider can produce.
    fn supported_aspect_ratios(&self) -> &[String];

    /// Per-call time limit this provider asks for, if any.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// True if the provider can produce the given aspect ratio.
    fn supports_aspect_ratio(&self, ratio: &str) -> bool {
        self.supported_aspect_ratios().iter().any(|r| r == ratio)
    }
}
