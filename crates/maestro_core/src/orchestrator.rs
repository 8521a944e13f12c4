//! Turn orchestration engine.
//!
//! Composes planner, dispatcher, confidence evaluator, and follow-up
//! generator into one request→response transaction per turn.
//!
//! ## Flow
//!
//! ```text
//! Start → Planned → Dispatched → Scored → (FollowUp?) → Done
//! ```
//!
//! ## Invariants
//!
//! 1. Single pass, left to right; no re-planning after dispatch
//! 2. Exactly one handler agent call per turn
//! 3. At most one follow-up generation call per turn
//! 4. `Done` is always reached: every failure below the entry point
//!    degrades instead of propagating
//! 5. Output sources are deduplicated, first-seen order preserved

use maestro_common::{dedup_sources, ConfidenceLevel, MaestroError, TurnRequest, TurnResult};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::classifier::{Classifier, OllamaClassifier};
use crate::confidence::{band, word_count};
use crate::config::MaestroConfig;
use crate::dispatch::{AgentTransport, Dispatcher, HttpAgentClient};
use crate::followup::{follow_up_questions, MAX_FOLLOW_UP_QUESTIONS};
use crate::planner::Planner;

/// One-turn orchestrator. Stateless across turns; safe to share
/// behind an `Arc` and run turns concurrently.
pub struct Orchestrator {
    planner: Planner,
    dispatcher: Dispatcher,
    classifier: Option<Arc<dyn Classifier>>,
}

impl Orchestrator {
    /// Wire the orchestrator from explicit ports. Tests inject fakes
    /// here; production code can use [`Orchestrator::from_config`].
    pub fn new(
        transport: Arc<dyn AgentTransport>,
        classifier: Option<Arc<dyn Classifier>>,
    ) -> Self {
        Self {
            planner: Planner::new(classifier.clone()),
            dispatcher: Dispatcher::new(transport),
            classifier,
        }
    }

    /// Build production ports from configuration
    pub fn from_config(config: &MaestroConfig) -> Self {
        let transport: Arc<dyn AgentTransport> =
            Arc::new(HttpAgentClient::from_config(&config.agents));
        let classifier: Option<Arc<dyn Classifier>> =
            OllamaClassifier::from_config(&config.classifier)
                .map(|c| Arc::new(c) as Arc<dyn Classifier>);
        Self::new(transport, classifier)
    }

    /// Run one turn: plan, dispatch, score, and (on low confidence)
    /// generate follow-up questions.
    ///
    /// The only error is an empty message, rejected before the state
    /// machine starts. Everything past the boundary degrades in place.
    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnResult, MaestroError> {
        let prompt = request.message.trim();
        if prompt.is_empty() {
            return Err(MaestroError::EmptyMessage);
        }

        let turn_id = Uuid::new_v4();
        let span = info_span!("turn", %turn_id);
        self.run_turn_inner(prompt, &request).instrument(span).await
    }

    async fn run_turn_inner(
        &self,
        prompt: &str,
        request: &TurnRequest,
    ) -> Result<TurnResult, MaestroError> {
        let plan = self.planner.plan(prompt, &request.history).await;

        let preferred_sources = request.preferred_sources();
        let agent_response = self
            .dispatcher
            .dispatch(plan, prompt, &request.history, &preferred_sources)
            .await;

        let confidence = Some(agent_response.confidence);
        let confidence_level = band(confidence, word_count(prompt));

        info!(
            "Turn scored: plan={}, confidence={:.2}, level={}",
            plan,
            agent_response.confidence,
            confidence_level.map(|l| l.as_str()).unwrap_or("none")
        );

        let follow_up = if confidence_level == Some(ConfidenceLevel::Low) {
            follow_up_questions(
                self.classifier.as_deref(),
                prompt,
                &request.history,
                MAX_FOLLOW_UP_QUESTIONS,
            )
            .await
        } else {
            Vec::new()
        };

        Ok(TurnResult {
            response: agent_response.response,
            sources: dedup_sources(&agent_response.sources),
            confidence,
            confidence_level,
            follow_up_questions: follow_up,
        })
    }
}
