//! Layered configuration for MiniStudio.
//!
//! Configuration is read in order, later sources overriding earlier ones:
//! 1. Bundled defaults (`ministudio.toml` compiled into the binary)
//! 2. User overrides in `~/.config/ministudio/ministudio.toml`
//! 3. Project overrides in `./ministudio.toml`
//!
//! # Example
//!
//! ```toml
//! [retry]
//! max_attempts = 5
//!
//! [sequence]
//! failure_policy = "continue"
//!
//! [providers.veo]
//! priority = 0
//! timeout_secs = 180
//! requests_per_minute = 10
//! ```

use config::{Config, File, FileFormat};
use ministudio_error::{ConfigError, StudioResult};
use ministudio_gateway::RetryConfig;
use ministudio_sequence::{CompilerConfig, SequenceConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Gateway-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Time limit for providers that declare none, in seconds
    #[serde(default)]
    pub default_timeout_secs: Option<u64>,
}

impl GatewaySettings {
    /// The default time limit as a duration.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_secs.map(Duration::from_secs)
    }
}

/// Per-provider overrides applied when the provider is registered.
///
/// Every field is optional; unset fields keep what the caller or provider chose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderOverride {
    /// Dispatch priority, lower is tried first
    #[serde(default)]
    pub priority: Option<i32>,
    /// Whether the provider starts enabled
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Per-call time limit in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Calls per minute allowed through to the provider
    #[serde(default)]
    pub requests_per_minute: Option<u32>,
}

/// Complete MiniStudio configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Retry and backoff per provider
    #[serde(default)]
    pub retry: RetryConfig,
    /// Run settings
    #[serde(default)]
    pub sequence: SequenceConfig,
    /// Prompt compiler settings
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Gateway-wide settings
    #[serde(default)]
    pub gateway: GatewaySettings,
    /// Overrides keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderOverride>,
}

impl StudioConfig {
    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or holds
    /// values that fail [`validate`](Self::validate).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StudioResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file exists but does not parse, or the
    /// merged values fail [`validate`](Self::validate).
    #[instrument]
    pub fn load() -> StudioResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../ministudio.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/ministudio/ministudio.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("ministudio").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot rule out on its own.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be at least 1"));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(ConfigError::new(format!(
                "retry.backoff_factor must be a finite number >= 1, got {}",
                self.retry.backoff_factor
            )));
        }
        if self.compiler.default_aspect_ratio.trim().is_empty() {
            return Err(ConfigError::new(
                "compiler.default_aspect_ratio must not be empty",
            ));
        }
        if let Some((name, _)) = self
            .providers
            .iter()
            .find(|(_, o)| o.timeout_secs == Some(0))
        {
            return Err(ConfigError::new(format!(
                "providers.{}.timeout_secs must be at least 1",
                name
            )));
        }
        Ok(())
    }

    /// Overrides for one provider, if any were configured.
    pub fn provider(&self, name: &str) -> Option<&ProviderOverride> {
        self.providers.get(name)
    }
}
