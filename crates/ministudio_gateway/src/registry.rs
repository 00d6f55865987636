//! Registered provider entries and their runtime state.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use ministudio_interface::{ProviderMetrics, ProviderStatus, VideoProvider};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Snapshot of one registered provider.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ProviderInfo {
    /// Provider name
    name: String,
    /// Lower values are tried first
    priority: i32,
    /// Whether the gateway will dispatch to it
    enabled: bool,
    /// Health derived from metrics
    status: ProviderStatus,
    /// Call statistics
    metrics: ProviderMetrics,
    /// Longest clip in seconds
    max_duration: f64,
    /// Producible aspect ratios
    supported_aspect_ratios: Vec<String>,
}

pub(crate) struct RegisteredProvider {
    provider: Arc<dyn VideoProvider>,
    name: String,
    priority: i32,
    sequence: u64,
    enabled: AtomicBool,
    timeout: Option<Duration>,
    limiter: Option<Arc<DirectRateLimiter>>,
    metrics: Mutex<ProviderMetrics>,
}

impl RegisteredProvider {
    pub(crate) fn new(provider: Arc<dyn VideoProvider>, priority: i32, sequence: u64) -> Self {
        let name = provider.name().to_string();
        Self {
            provider,
            name,
            priority,
            sequence,
            enabled: AtomicBool::new(true),
            timeout: None,
            limiter: None,
            metrics: Mutex::new(ProviderMetrics::default()),
        }
    }

    pub(crate) fn provider(&self) -> &Arc<dyn VideoProvider> {
        &self.provider
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Sort key: priority first, then registration order.
    pub(crate) fn order_key(&self) -> (i32, u64) {
        (self.priority, self.sequence)
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub(crate) fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_requests_per_minute(&mut self, rpm: Option<u32>) {
        self.limiter = rpm
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n))));
    }

    /// Wait for the provider's request quota, if it has one.
    pub(crate) async fn wait_for_quota(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    pub(crate) fn record_success(&self, latency: Duration) {
        self.metrics_guard().record_success(latency);
    }

    pub(crate) fn record_failure(&self, message: impl Into<String>) {
        self.metrics_guard().record_failure(message);
    }

    pub(crate) fn info(&self) -> ProviderInfo {
        let metrics = self.metrics_guard().clone();
        let enabled = self.is_enabled();
        ProviderInfo {
            name: self.name.clone(),
            priority: self.priority,
            enabled,
            status: metrics.status(enabled),
            metrics,
            max_duration: self.provider.max_duration(),
            supported_aspect_ratios: self.provider.supported_aspect_ratios().to_vec(),
        }
    }

    // Metrics are plain counters, so a poisoned lock still holds usable data.
    fn metrics_guard(&self) -> MutexGuard<'_, ProviderMetrics> {
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
