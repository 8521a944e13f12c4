//! Classifier port.
//!
//! The planner and the follow-up generator both lean on a small LLM:
//! once to pick a plan token, once to draft clarifying questions. This
//! module abstracts that capability behind a trait so orchestration
//! can be tested without a model.
//!
//! Production code uses `OllamaClassifier` against an Ollama-compatible
//! chat endpoint. Test code uses `FakeClassifier` with scripted
//! replies.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use maestro_common::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::config::ClassifierConfig;

/// Abstract completion capability consumed by the planner and the
/// follow-up generator. May be unavailable, may fail, may time out;
/// callers are expected to degrade gracefully.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Run one chat completion and return the raw response text
    async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String>;
}

// ============================================================================
// Ollama-backed classifier (production)
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
        ChatRole::System => "system",
    }
}

/// Classifier over an Ollama-compatible `/api/chat` endpoint
pub struct OllamaClassifier {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClassifier {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Build from config; `None` when the classifier is disabled
    pub fn from_config(config: &ClassifierConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Some(Self::new(
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Classifier for OllamaClassifier {
    async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let mut chat_messages = Vec::with_capacity(messages.len() + 1);
        chat_messages.push(OllamaMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        });
        for msg in messages {
            chat_messages.push(OllamaMessage {
                role: role_str(msg.role).to_string(),
                content: msg.content.clone(),
            });
        }

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: chat_messages,
            stream: false,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to classifier")?;

        if !response.status().is_success() {
            bail!("Classifier returned status {}", response.status());
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .context("Failed to decode classifier response")?;

        debug!(
            "Classifier [{}] replied ({} chars)",
            self.model,
            parsed.message.content.len()
        );
        Ok(parsed.message.content)
    }
}

// ============================================================================
// Fake classifier (testing)
// ============================================================================

/// Scripted classifier for deterministic tests.
///
/// Replies are consumed in order; once the script is exhausted, or for
/// a classifier built with [`FakeClassifier::failing`], every call
/// errors the way an unreachable model would.
#[derive(Default)]
pub struct FakeClassifier {
    replies: Mutex<VecDeque<String>>,
    call_count: Mutex<usize>,
}

impl FakeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier whose every call fails
    pub fn failing() -> Self {
        Self::default()
    }

    /// Queue one scripted reply
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(text.into());
        self
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn complete(&self, _system_prompt: &str, _messages: &[ChatMessage]) -> Result<String> {
        *self.call_count.lock().unwrap() += 1;
        match self.replies.lock().unwrap().pop_front() {
            Some(text) => Ok(text),
            None => bail!("fake classifier unreachable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_replies_in_order() {
        let fake = FakeClassifier::new().reply("first").reply("second");
        assert_eq!(fake.complete("s", &[]).await.unwrap(), "first");
        assert_eq!(fake.complete("s", &[]).await.unwrap(), "second");
        assert!(fake.complete("s", &[]).await.is_err());
        assert_eq!(fake.calls(), 3);
    }

    #[test]
    fn test_disabled_config_yields_none() {
        let config = ClassifierConfig {
            enabled: false,
            ..ClassifierConfig::default()
        };
        assert!(OllamaClassifier::from_config(&config).is_none());
    }
}
