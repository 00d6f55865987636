//! Types exchanged between providers and the gateway.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a provider returns for a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProviderOutput {
    /// Opaque reference to the generated clip
    output_ref: String,
    /// Reference to the clip's last frame
    trailing_frame: Option<String>,
    /// Seed the provider actually used
    seed: Option<u64>,
    /// Provider-specific token for native continuation
    continuity_token: Option<String>,
}

impl ProviderOutput {
    /// Create an output with only a reference.
    pub fn new(output_ref: impl Into<String>) -> Self {
        Self {
            output_ref: output_ref.into(),
            trailing_frame: None,
            seed: None,
            continuity_token: None,
        }
    }

    /// Builder method to set the trailing frame reference.
    pub fn with_trailing_frame(mut self, frame: impl Into<String>) -> Self {
        self.trailing_frame = Some(frame.into());
        self
    }

    /// Builder method to set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to set the continuation token.
    pub fn with_continuity_token(mut self, token: impl Into<String>) -> Self {
        self.continuity_token = Some(token.into());
        self
    }
}

/// Health of a registered provider, derived from its metrics.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderStatus {
    /// Recent calls succeed
    Healthy,
    /// Some recent failures or a low success rate
    Degraded,
    /// Disabled or failing repeatedly
    Unhealthy,
    /// No calls made yet
    Unknown,
}

/// Running call statistics for one provider.
///
/// Metrics are informational. They never change which provider the gateway
/// tries next.
///
/// # Examples
///
/// ```
/// use ministudio_interface::{ProviderMetrics, ProviderStatus};
/// use std::time::Duration;
///
/// let mut metrics = ProviderMetrics::default();
/// assert_eq!(metrics.status(true), ProviderStatus::Unknown);
///
/// metrics.record_success(Duration::from_millis(200));
/// assert_eq!(metrics.status(true), ProviderStatus::Healthy);
///
/// metrics.record_failure("timeout");
/// assert_eq!(metrics.status(true), ProviderStatus::Degraded);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProviderMetrics {
    /// Calls made
    total_requests: u64,
    /// Calls that returned output
    successful_requests: u64,
    /// Calls that returned an error
    failed_requests: u64,
    /// Failures since the last success
    consecutive_failures: u32,
    /// Summed latency of successful calls
    total_latency: Duration,
    /// Most recent failure message
    last_error: Option<String>,
}

impl ProviderMetrics {
    /// Consecutive failures at which a provider is reported unhealthy.
    pub const UNHEALTHY_AFTER: u32 = 3;

    /// Record a successful call.
    pub fn record_success(&mut self, latency: Duration) {
        self.total_requests += 1;
        self.successful_requests += 1;
        self.consecutive_failures = 0;
        self.total_latency += latency;
    }

    /// Record a failed call.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.total_requests += 1;
        self.failed_requests += 1;
        self.consecutive_failures += 1;
        self.last_error = Some(message.into());
    }

    /// Fraction of calls that succeeded, or `None` before the first call.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_requests == 0 {
            None
        } else {
            Some(self.successful_requests as f64 / self.total_requests as f64)
        }
    }

    /// Mean latency of successful calls.
    pub fn average_latency(&self) -> Option<Duration> {
        if self.successful_requests == 0 {
            None
        } else {
            Some(self.total_latency / self.successful_requests as u32)
        }
    }

    /// Health status for a provider that is or is not enabled.
    pub fn status(&self, enabled: bool) -> ProviderStatus {
        if !enabled || self.consecutive_failures >= Self::UNHEALTHY_AFTER {
            return ProviderStatus::Unhealthy;
        }
        match self.success_rate() {
            None => ProviderStatus::Unknown,
            Some(rate) if self.consecutive_failures > 0 || rate < 0.5 => ProviderStatus::Degraded,
            Some(_) => ProviderStatus::Healthy,
        }
    }
}
