//! Priority-ordered dispatch with retry and fallback.

use crate::registry::RegisteredProvider;
use crate::{ProviderInfo, RetryConfig};
use ministudio_core::{
    CompiledRequest, ContinuityPayload, GenerationResult, ProviderAttempt, ShotError,
};
use ministudio_error::{
    FailureClass, GatewayError, GatewayErrorKind, ProviderError, ProviderErrorKind,
    RetryableError,
};
use ministudio_interface::{ProviderMetrics, ProviderOutput, VideoProvider};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Registry of video providers and the single entry point for generation.
///
/// # Examples
///
/// ```no_run
/// use ministudio_gateway::{ProviderGateway, RetryConfig};
///
/// let gateway = ProviderGateway::new().with_retry(RetryConfig::no_retry());
/// assert!(gateway.is_empty());
/// ```
#[derive(Default)]
pub struct ProviderGateway {
    providers: Vec<RegisteredProvider>,
    next_sequence: u64,
    retry: RetryConfig,
    default_timeout: Option<Duration>,
}

impl ProviderGateway {
    /// Creates an empty gateway with the default retry policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder method to set the time limit for providers without their own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// The retry policy in effect.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Register a provider. Lower `priority` values are tried first; equal
    /// priorities keep registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the provider declares limits
    /// no request could satisfy.
    #[instrument(skip(self, provider), fields(provider = provider.name()))]
    pub fn register(
        &mut self,
        provider: Arc<dyn VideoProvider>,
        priority: i32,
    ) -> Result<(), GatewayError> {
        let name = provider.name().to_string();
        if let Some(reason) = invalid_limits(provider.as_ref()) {
            return Err(GatewayError::new(GatewayErrorKind::InvalidLimits {
                provider: name,
                reason,
            }));
        }
        if self.find(&name).is_some() {
            return Err(GatewayError::new(GatewayErrorKind::DuplicateProvider(name)));
        }

        let entry = RegisteredProvider::new(provider, priority, self.next_sequence);
        self.next_sequence += 1;
        self.providers.push(entry);
        self.providers.sort_by_key(|p| p.order_key());

        info!(priority, providers = self.providers.len(), "Registered provider");
        Ok(())
    }

    /// Remove a provider and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider has this name.
    pub fn unregister(&mut self, name: &str) -> Result<Arc<dyn VideoProvider>, GatewayError> {
        let position = self
            .providers
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| unknown(name))?;
        let entry = self.providers.remove(position);
        info!(provider = name, "Unregistered provider");
        Ok(Arc::clone(entry.provider()))
    }

    /// Resume dispatching to a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider has this name.
    pub fn enable(&self, name: &str) -> Result<(), GatewayError> {
        self.find(name).ok_or_else(|| unknown(name))?.set_enabled(true);
        info!(provider = name, "Enabled provider");
        Ok(())
    }

    /// Stop dispatching to a provider without removing it.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider has this name.
    pub fn disable(&self, name: &str) -> Result<(), GatewayError> {
        self.find(name).ok_or_else(|| unknown(name))?.set_enabled(false);
        info!(provider = name, "Disabled provider");
        Ok(())
    }

    /// Override a provider's per-call time limit.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider has this name.
    pub fn set_timeout(&mut self, name: &str, timeout: Option<Duration>) -> Result<(), GatewayError> {
        self.find_mut(name)
            .ok_or_else(|| unknown(name))?
            .set_timeout(timeout);
        Ok(())
    }

    /// Cap how many calls per minute reach a provider. `None` or zero removes the cap.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider has this name.
    pub fn set_requests_per_minute(
        &mut self,
        name: &str,
        rpm: Option<u32>,
    ) -> Result<(), GatewayError> {
        self.find_mut(name)
            .ok_or_else(|| unknown(name))?
            .set_requests_per_minute(rpm);
        Ok(())
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Snapshots of every provider in the order they are tried.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.providers.iter().map(|p| p.info()).collect()
    }

    /// Snapshot of one provider.
    pub fn provider(&self, name: &str) -> Option<ProviderInfo> {
        self.find(name).map(|p| p.info())
    }

    /// Call statistics for one provider.
    pub fn metrics(&self, name: &str) -> Option<ProviderMetrics> {
        self.find(name).map(|p| p.info().metrics().clone())
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True if no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Generate a clip for a compiled request.
    ///
    /// Enabled providers are tried in order. Each one is retried on transient
    /// failures up to the configured attempt count before the next is tried.
    /// The first success wins. If none succeeds, the result carries one
    /// [`ProviderAttempt`] per provider tried.
    #[instrument(skip(self, request), fields(shot = *request.shot_index()))]
    pub async fn generate(&self, request: &CompiledRequest) -> GenerationResult {
        let started = Instant::now();
        let mut failures = Vec::new();

        for entry in self.providers.iter().filter(|p| p.is_enabled()) {
            match self.dispatch(entry, request).await {
                Ok(output) => {
                    info!(
                        provider = entry.name(),
                        output = %output.output_ref(),
                        fallbacks = failures.len(),
                        "Shot generated"
                    );
                    let payload = ContinuityPayload::new(
                        *request.shot_index(),
                        entry.name(),
                        output.output_ref().clone(),
                    )
                    .with_trailing_frame(output.trailing_frame().clone())
                    .with_seed(output.seed().or(*request.seed()))
                    .with_token(output.continuity_token().clone());
                    return GenerationResult::success(payload, started.elapsed())
                        .with_failed_attempts(failures);
                }
                Err(attempt) => {
                    warn!(
                        provider = entry.name(),
                        attempts = attempt.attempts(),
                        class = %attempt.class(),
                        "Provider exhausted, falling through"
                    );
                    failures.push(attempt);
                }
            }
        }

        warn!(providers = failures.len(), "All providers failed");
        GenerationResult::failure(
            *request.shot_index(),
            ShotError::ExhaustedProviders(failures),
            started.elapsed(),
        )
    }

    /// Fit the request to one provider and call it with retries.
    async fn dispatch(
        &self,
        entry: &RegisteredProvider,
        request: &CompiledRequest,
    ) -> Result<ProviderOutput, ProviderAttempt> {
        let provider = entry.provider();

        if !provider.supports_aspect_ratio(request.aspect_ratio()) {
            let err = ProviderErrorKind::UnsupportedAspectRatio(request.aspect_ratio().clone());
            debug!(provider = entry.name(), "Skipping provider without matching aspect ratio");
            return Err(ProviderAttempt::new(
                entry.name(),
                0,
                FailureClass::Permanent,
                err.to_string(),
            ));
        }

        let fitted = request.clamped_to(provider.max_duration());
        if *fitted.duration_clamped() && !*request.duration_clamped() {
            info!(
                provider = entry.name(),
                requested = *request.duration(),
                clamped = *fitted.duration(),
                "Clamped shot duration to provider maximum"
            );
        }

        let limit = entry
            .timeout_override()
            .or_else(|| provider.timeout())
            .or(self.default_timeout);
        let attempts = AtomicU32::new(0);

        let outcome = Retry::spawn(self.retry.delays(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let fitted = &fitted;
            async move {
                entry.wait_for_quota().await;
                let call_started = Instant::now();
                let result = match limit {
                    Some(limit) => tokio::time::timeout(limit, provider.generate(fitted))
                        .await
                        .unwrap_or_else(|_| {
                            Err(ProviderError::new(ProviderErrorKind::Timeout(
                                limit.as_millis(),
                            )))
                        }),
                    None => provider.generate(fitted).await,
                };

                match result {
                    Ok(output) => {
                        entry.record_success(call_started.elapsed());
                        Ok(output)
                    }
                    Err(e) => {
                        entry.record_failure(e.kind.to_string());
                        if e.is_retryable() {
                            warn!(provider = entry.name(), attempt, error = %e.kind, "Transient provider failure");
                            Err(RetryError::Transient {
                                err: e,
                                retry_after: None,
                            })
                        } else {
                            warn!(provider = entry.name(), attempt, error = %e.kind, "Permanent provider failure");
                            Err(RetryError::Permanent(e))
                        }
                    }
                }
            }
        })
        .await;

        outcome.map_err(|e| {
            ProviderAttempt::new(
                entry.name(),
                attempts.load(Ordering::SeqCst),
                e.class(),
                e.kind.to_string(),
            )
        })
    }

    fn find(&self, name: &str) -> Option<&RegisteredProvider> {
        self.providers.iter().find(|p| p.name() == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut RegisteredProvider> {
        self.providers.iter_mut().find(|p| p.name() == name)
    }
}

fn unknown(name: &str) -> GatewayError {
    GatewayError::new(GatewayErrorKind::UnknownProvider(name.to_string()))
}

fn invalid_limits(provider: &dyn VideoProvider) -> Option<String> {
    if provider.name().trim().is_empty() {
        return Some("name cannot be empty".to_string());
    }
    let max = provider.max_duration();
    if !max.is_finite() || max <= 0.0 {
        return Some(format!("max duration must be positive, got {}", max));
    }
    if provider.supported_aspect_ratios().is_empty() {
        return Some("no supported aspect ratios".to_string());
    }
    None
}
