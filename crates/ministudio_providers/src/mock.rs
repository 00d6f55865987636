//! Deterministic provider that never leaves the process.

use crate::COMMON_ASPECT_RATIOS;
use async_trait::async_trait;
use ministudio_core::CompiledRequest;
use ministudio_error::ProviderResult;
use ministudio_interface::{ProviderOutput, VideoProvider};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

/// Provider whose output reference is a SHA-256 digest of the request.
///
/// Equal requests always produce equal outputs, so whole runs are
/// reproducible without network access.
///
/// # Examples
///
/// ```
/// use ministudio_core::CompiledRequestBuilder;
/// use ministudio_interface::VideoProvider;
/// use ministudio_providers::MockVideoProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockVideoProvider::new();
/// let request = CompiledRequestBuilder::default()
///     .shot_index(0usize)
///     .prompt("A golden orb")
///     .negative_prompt("blurry")
///     .duration(4.0)
///     .aspect_ratio("16:9")
///     .build()
///     .unwrap();
///
/// let first = provider.generate(&request).await.unwrap();
/// let second = provider.generate(&request).await.unwrap();
/// assert_eq!(first, second);
/// assert!(first.output_ref().starts_with("mock://"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockVideoProvider {
    name: String,
    max_duration: f64,
    aspect_ratios: Vec<String>,
    latency: Option<Duration>,
}

impl Default for MockVideoProvider {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            max_duration: 10.0,
            aspect_ratios: COMMON_ASPECT_RATIOS.iter().map(|r| r.to_string()).collect(),
            latency: None,
        }
    }
}

impl MockVideoProvider {
    /// Create a provider named `mock` accepting clips up to 10 seconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to rename the provider.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to set the longest clip in seconds.
    pub fn with_max_duration(mut self, seconds: f64) -> Self {
        self.max_duration = seconds;
        self
    }

    /// Builder method to set the accepted aspect ratios.
    pub fn with_aspect_ratios<I, S>(mut self, ratios: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aspect_ratios = ratios.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to simulate processing time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn digest(request: &CompiledRequest) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(request.prompt().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.negative_prompt().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.duration().to_bits().to_be_bytes());
        hasher.update(request.aspect_ratio().as_bytes());
        if let Some(seed) = request.seed() {
            hasher.update(seed.to_be_bytes());
        }
        if let Some(payload) = request.continuity_payload() {
            hasher.update(payload.output_ref().as_bytes());
        }
        hasher.finalize().to_vec()
    }
}

#[async_trait]
impl VideoProvider for MockVideoProvider {
    async fn generate(&self, request: &CompiledRequest) -> ProviderResult<ProviderOutput> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let digest = Self::digest(request);
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        let output_ref = format!("{}://{}", self.name, hex);
        let seed = request
            .seed()
            .unwrap_or_else(|| digest.iter().take(8).fold(0u64, |acc, b| (acc << 8) | u64::from(*b)));

        debug!(provider = %self.name, output = %output_ref, "Mock generation complete");

        Ok(ProviderOutput::new(output_ref.clone())
            .with_trailing_frame(format!("{}#last-frame", output_ref))
            .with_seed(seed))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn max_duration(&self) -> f64 {
        self.max_duration
    }

    fn supported_aspect_ratios(&self) -> &[String] {
        &self.aspect_ratios
    }
}
