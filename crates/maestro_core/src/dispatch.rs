//! Handler dispatch.
//!
//! Executes the chosen plan by calling the bound handler agent over
//! HTTP with a uniform request shape. Every failure mode is converted
//! into a well-formed degraded [`AgentResponse`] in one place - this is
//! the core's availability guarantee: a failing handler costs one
//! low-confidence error sentence, never the whole turn.

use async_trait::async_trait;
use maestro_common::{AgentRequest, AgentResponse, ChatMessage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::AgentsConfig;
use crate::planner::Plan;

/// Failure taxonomy for one agent call
#[derive(Error, Debug)]
pub enum AgentCallError {
    /// Non-2xx status; `detail` extracted from a JSON error body when present
    #[error("agent returned status {status}{}", .detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// Connection refused, timeout, DNS failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Body arrived but could not be decoded as an AgentResponse
    #[error("decode error: {0}")]
    Decode(String),
}

/// Network-call port to a named handler agent.
///
/// Production code uses `HttpAgentClient`; tests use
/// `FakeAgentTransport` with scripted per-agent outcomes.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn call_agent(
        &self,
        agent_name: &str,
        request: &AgentRequest,
    ) -> Result<AgentResponse, AgentCallError>;
}

// ============================================================================
// HTTP transport (production)
// ============================================================================

/// Client for calling agent endpoints at `{base_url}/api/agents/{name}`
pub struct HttpAgentClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AgentsConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl AgentTransport for HttpAgentClient {
    async fn call_agent(
        &self,
        agent_name: &str,
        request: &AgentRequest,
    ) -> Result<AgentResponse, AgentCallError> {
        let url = format!(
            "{}/api/agents/{}",
            self.base_url.trim_end_matches('/'),
            agent_name
        );

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentCallError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Agents report failures as {"detail": "..."} bodies
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));
            return Err(AgentCallError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<AgentResponse>()
            .await
            .map_err(|e| AgentCallError::Decode(e.to_string()))
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Executes a plan against its handler agent, never raising
pub struct Dispatcher {
    transport: std::sync::Arc<dyn AgentTransport>,
}

impl Dispatcher {
    pub fn new(transport: std::sync::Arc<dyn AgentTransport>) -> Self {
        Self { transport }
    }

    /// Call the handler bound to `plan`. Every failure path yields a
    /// degraded response with readable error text and zero confidence;
    /// successful responses come back with confidence clamped to [0,1].
    pub async fn dispatch(
        &self,
        plan: Plan,
        prompt: &str,
        history: &[ChatMessage],
        preferred_sources: &[String],
    ) -> AgentResponse {
        let agent_name = plan.agent_name();

        let mut metadata = HashMap::new();
        metadata.insert("preferred_sources".to_string(), json!(preferred_sources));

        let request = AgentRequest {
            prompt: prompt.to_string(),
            history: history.to_vec(),
            context: None,
            metadata,
        };

        info!("Dispatching plan {} to agent {}", plan, agent_name);

        match self.transport.call_agent(agent_name, &request).await {
            Ok(response) => response.normalized(),
            Err(e) => {
                error!("Error calling agent {}: {}", agent_name, e);
                AgentResponse::degraded(format!("Error calling agent {}: {}", agent_name, e))
            }
        }
    }
}

// ============================================================================
// Fake transport (testing)
// ============================================================================

/// Scripted outcome for one agent in a fake transport
pub enum FakeAgentOutcome {
    Respond(AgentResponse),
    Fail(fn() -> AgentCallError),
}

/// Fake agent transport with per-agent scripted outcomes.
///
/// Unknown agents fail the way an unreachable endpoint would.
#[derive(Default)]
pub struct FakeAgentTransport {
    outcomes: HashMap<String, FakeAgentOutcome>,
    requests: Mutex<Vec<(String, AgentRequest)>>,
}

impl FakeAgentTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for an agent
    pub fn respond(mut self, agent_name: &str, response: AgentResponse) -> Self {
        self.outcomes
            .insert(agent_name.to_string(), FakeAgentOutcome::Respond(response));
        self
    }

    /// Script a simple text answer with the given confidence
    pub fn answer(self, agent_name: &str, text: &str, confidence: f64) -> Self {
        self.respond(
            agent_name,
            AgentResponse {
                response: text.to_string(),
                sources: Vec::new(),
                confidence,
                metadata: HashMap::new(),
            },
        )
    }

    /// Script a failure for an agent
    pub fn fail(mut self, agent_name: &str, make_error: fn() -> AgentCallError) -> Self {
        self.outcomes
            .insert(agent_name.to_string(), FakeAgentOutcome::Fail(make_error));
        self
    }

    /// Requests captured so far, for assertions
    pub fn requests(&self) -> Vec<(String, AgentRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentTransport for FakeAgentTransport {
    async fn call_agent(
        &self,
        agent_name: &str,
        request: &AgentRequest,
    ) -> Result<AgentResponse, AgentCallError> {
        self.requests
            .lock()
            .unwrap()
            .push((agent_name.to_string(), request.clone()));

        match self.outcomes.get(agent_name) {
            Some(FakeAgentOutcome::Respond(response)) => Ok(response.clone()),
            Some(FakeAgentOutcome::Fail(make_error)) => Err(make_error()),
            None => Err(AgentCallError::Transport(format!(
                "connection refused: {}",
                agent_name
            ))),
        }
    }
}
