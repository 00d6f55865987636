//! Assembles a gateway and orchestrator from configuration.

use crate::StudioConfig;
use ministudio_core::{ShotSpec, WorldState};
use ministudio_error::StudioResult;
use ministudio_gateway::ProviderGateway;
use ministudio_interface::VideoProvider;
use ministudio_sequence::{
    PromptCompiler, SequenceObserver, SequenceOrchestrator, SequenceRunResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Entry point that wires providers and configuration together.
///
/// Providers are handed over with a default priority. Matching
/// `[providers.<name>]` entries in the configuration override that priority
/// and set enablement, timeouts and rate limits when the gateway is built.
///
/// # Examples
///
/// ```
/// use ministudio::{MockVideoProvider, ShotSpec, Studio, StudioConfig, WorldState};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let studio = Studio::new(StudioConfig::default())
///     .with_provider(Arc::new(MockVideoProvider::new()), 0);
///
/// let run = studio
///     .run(WorldState::new(), &[ShotSpec::new("A lantern flickers on", 4.0)])
///     .await?;
/// assert_eq!(run.success_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Studio {
    config: StudioConfig,
    providers: Vec<(Arc<dyn VideoProvider>, i32)>,
    observer: Option<Arc<dyn SequenceObserver>>,
}

impl Studio {
    /// Create a studio with no providers.
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            providers: Vec::new(),
            observer: None,
        }
    }

    /// Create a studio from the layered configuration files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub fn from_default_config() -> StudioResult<Self> {
        Ok(Self::new(StudioConfig::load()?))
    }

    /// Builder method to add a provider at the given priority.
    pub fn with_provider(mut self, provider: Arc<dyn VideoProvider>, priority: i32) -> Self {
        self.providers.push((provider, priority));
        self
    }

    /// Builder method to attach a progress observer to orchestrators.
    pub fn with_observer(mut self, observer: Arc<dyn SequenceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Build a gateway holding every provider with configured overrides applied.
    ///
    /// Overrides naming a provider that was never added are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if two providers share a name or a provider declares
    /// invalid limits.
    #[instrument(skip(self), fields(providers = self.providers.len()))]
    pub fn build_gateway(&self) -> StudioResult<ProviderGateway> {
        let mut gateway = ProviderGateway::new()
            .with_retry(self.config.retry.clone())
            .with_default_timeout(self.config.gateway.default_timeout());

        for (provider, priority) in &self.providers {
            let name = provider.name().to_string();
            let overrides = self.config.provider(&name);
            let priority = overrides.and_then(|o| o.priority).unwrap_or(*priority);
            gateway.register(Arc::clone(provider), priority)?;

            let Some(overrides) = overrides else {
                continue;
            };
            debug!(provider = %name, ?overrides, "Applying provider overrides");
            if let Some(secs) = overrides.timeout_secs {
                gateway.set_timeout(&name, Some(Duration::from_secs(secs)))?;
            }
            if overrides.requests_per_minute.is_some() {
                gateway.set_requests_per_minute(&name, overrides.requests_per_minute)?;
            }
            if overrides.enabled == Some(false) {
                gateway.disable(&name)?;
            }
        }

        for name in self.config.providers.keys() {
            if !self.providers.iter().any(|(p, _)| p.name() == name) {
                warn!(provider = %name, "Configured provider was never added");
            }
        }

        info!(order = ?gateway.provider_names(), "Gateway ready");
        Ok(gateway)
    }

    /// Build an orchestrator over a fresh gateway.
    ///
    /// # Errors
    ///
    /// See [`build_gateway`](Self::build_gateway).
    pub fn orchestrator(&self) -> StudioResult<SequenceOrchestrator> {
        let gateway = Arc::new(self.build_gateway()?);
        let orchestrator = SequenceOrchestrator::new(gateway)
            .with_compiler(PromptCompiler::new(self.config.compiler.clone()))
            .with_config(self.config.sequence.clone());
        Ok(match &self.observer {
            Some(observer) => orchestrator.with_observer(Arc::clone(observer)),
            None => orchestrator,
        })
    }

    /// Run one sequence with the configured failure policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be built, no providers were
    /// added, or `shots` is empty.
    pub async fn run(
        &self,
        initial_state: WorldState,
        shots: &[ShotSpec],
    ) -> StudioResult<SequenceRunResult> {
        self.orchestrator()?.run(initial_state, shots).await
    }
}
