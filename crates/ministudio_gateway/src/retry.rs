//! Retry policy for transient provider failures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::jitter;

/// Backoff settings applied to each provider independently.
///
/// With the defaults a provider is called at most three times, sleeping
/// 1 s and then 2 s between calls.
///
/// # Examples
///
/// ```
/// use ministudio_gateway::RetryConfig;
/// use std::time::Duration;
///
/// let delays: Vec<Duration> = RetryConfig::default().delays().collect();
/// assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total calls per provider, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Multiplier applied to the delay after each retry
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    /// Upper bound on any single delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Randomize each delay
    #[serde(default)]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: default_max_delay_ms(),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// A policy that calls each provider exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sleep durations between consecutive calls to one provider.
    ///
    /// Yields `max_attempts - 1` delays.
    pub fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        let initial = self.initial_backoff_ms as f64;
        let factor = self.backoff_factor.max(1.0);
        let cap = self.max_delay_ms as f64;
        let retries = self.max_attempts.saturating_sub(1);

        let schedule = (0..retries).map(move |n| {
            let millis = (initial * factor.powi(n as i32)).min(cap);
            Duration::from_millis(millis as u64)
        });

        if self.jitter {
            Box::new(schedule.map(jitter))
        } else {
            Box::new(schedule)
        }
    }
}
