//! Turn entry/exit contract.
//!
//! A turn is one request/response cycle of the conversation. The core
//! is stateless across turns: history and metadata are supplied by the
//! caller on every call and nothing here survives the turn.

use crate::confidence::ConfidenceLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Metadata key under which the caller passes source names surfaced in
/// a previous turn, used to bias the next retrieval.
pub const LAST_SOURCES_KEY: &str = "lastSources";

/// Speaker role for a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One conversation message. Immutable once created; ordering within
/// the history is chronological and significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Input for one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl TurnRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Source names the caller surfaced in a prior turn, read from
    /// `metadata["lastSources"]`. Non-string entries are skipped.
    pub fn preferred_sources(&self) -> Vec<String> {
        match self.metadata.get(LAST_SOURCES_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Output of one turn. Fully derived; holds no identity beyond the
/// single turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preferred_sources_from_metadata() {
        let mut req = TurnRequest::new("follow up on that log");
        req.metadata.insert(
            LAST_SOURCES_KEY.to_string(),
            json!(["app.log", "gc.log", 42]),
        );
        assert_eq!(req.preferred_sources(), vec!["app.log", "gc.log"]);
    }

    #[test]
    fn test_preferred_sources_absent() {
        let req = TurnRequest::new("hello");
        assert!(req.preferred_sources().is_empty());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let msg = ChatMessage::user("hi");
        let s = serde_json::to_string(&msg).unwrap();
        assert!(s.contains("\"user\""));
    }
}
