//! Compiler and run settings.

use crate::FailurePolicy;
use crate::compiler::DEFAULT_STYLE_EXCLUSIONS;
use serde::{Deserialize, Serialize};

/// Settings for [`PromptCompiler`](crate::PromptCompiler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Aspect ratio for shots that do not set one
    #[serde(default = "default_aspect_ratio")]
    pub default_aspect_ratio: String,
    /// Fixed negative prompt terms, placed before any entity traits
    #[serde(default = "default_style_exclusions")]
    pub style_exclusions: Vec<String>,
    /// Global visual style appended after entity descriptions
    #[serde(default)]
    pub style: Option<String>,
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_style_exclusions() -> Vec<String> {
    DEFAULT_STYLE_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_aspect_ratio: default_aspect_ratio(),
            style_exclusions: default_style_exclusions(),
            style: None,
        }
    }
}

/// Settings for [`SequenceOrchestrator`](crate::SequenceOrchestrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Policy used by [`run`](crate::SequenceOrchestrator::run)
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Use one seed for every shot in a run
    #[serde(default)]
    pub lock_seed: bool,
    /// Seed to lock to; when absent the first successful shot's seed is used
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            lock_seed: false,
            seed: None,
        }
    }
}
