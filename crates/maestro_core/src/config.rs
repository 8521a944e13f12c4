//! Configuration management for the orchestration core.
//!
//! Loads settings from /etc/maestro/config.toml or uses defaults.
//! Every field carries a serde default so partial files work.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/maestro/config.toml";

/// Handler agent dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Base URL of the agent endpoints (internal service)
    #[serde(default = "default_agent_base_url")]
    pub base_url: String,

    /// Per-dispatch timeout in seconds
    #[serde(default = "default_agent_timeout")]
    pub timeout_secs: u64,
}

fn default_agent_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_agent_timeout() -> u64 {
    // Handlers may themselves call an LLM; give them a full minute
    60
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            base_url: default_agent_base_url(),
            timeout_secs: default_agent_timeout(),
        }
    }
}

/// Classifier (planning/follow-up LLM) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ollama-compatible chat endpoint base URL
    #[serde(default = "default_classifier_base_url")]
    pub base_url: String,

    /// Model used for plan classification and follow-up questions
    #[serde(default = "default_classifier_model")]
    pub model: String,

    /// Per-call timeout in seconds. Short on purpose: a slow
    /// classifier degrades to the fallback plan, it never stalls the
    /// turn.
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,

    /// Whether a classifier is wired at all. With this off the planner
    /// relies on deterministic overrides and the fallback plan only.
    #[serde(default = "default_classifier_enabled")]
    pub enabled: bool,
}

fn default_classifier_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_classifier_model() -> String {
    "qwen3:4b".to_string()
}

fn default_classifier_timeout() -> u64 {
    8
}

fn default_classifier_enabled() -> bool {
    true
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_classifier_base_url(),
            model: default_classifier_model(),
            timeout_secs: default_classifier_timeout(),
            enabled: default_classifier_enabled(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaestroConfig {
    #[serde(default)]
    pub agents: AgentsConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl MaestroConfig {
    /// Load config from the standard path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH).unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {}", e);
            MaestroConfig::default()
        })
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MaestroConfig = toml::from_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }
}
