//! Agent wire contract.
//!
//! Every handler agent, regardless of specialty, speaks this one
//! request/response shape. Handlers are free to violate the confidence
//! contract; [`AgentResponse::normalized`] repairs what it can so the
//! orchestrator never sees an out-of-range score.

use crate::chat::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Confidence assumed when a handler omits the field
pub const DEFAULT_AGENT_CONFIDENCE: f64 = 0.8;

/// Request posted to a handler agent. Built fresh per dispatch and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub prompt: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// Response returned by a handler agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

fn default_confidence() -> f64 {
    DEFAULT_AGENT_CONFIDENCE
}

impl AgentResponse {
    /// Degraded response used when a handler call fails: readable error
    /// text, no sources, zero confidence.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            response: message.into(),
            sources: Vec::new(),
            confidence: 0.0,
            metadata: HashMap::new(),
        }
    }

    /// Clamp confidence into [0,1]. NaN collapses to 0.0.
    pub fn normalized(mut self) -> Self {
        if self.confidence.is_nan() {
            self.confidence = 0.0;
        } else {
            self.confidence = self.confidence.clamp(0.0, 1.0);
        }
        self
    }
}

/// Deduplicate source names preserving first-seen order
pub fn dedup_sources(sources: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    sources
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect()
}
