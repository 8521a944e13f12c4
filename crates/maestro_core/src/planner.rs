//! Turn planner - deterministic overrides layered over an LLM classifier.
//!
//! Ensures reliable routing for known phrase classes regardless of
//! classifier behavior: broad web requests and time/location questions
//! are routed by phrase match, everything else is offered to the
//! classifier, and the direct plan is the fallback when no signal is
//! available. Planning never fails; a dead classifier just means the
//! fallback applies.

use maestro_common::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::Classifier;

/// Trailing history messages forwarded to the classifier
pub const HISTORY_WINDOW: usize = 4;

/// The closed set of handlers a turn can be routed to.
///
/// Exactly one plan is chosen per turn. Declaration order is the
/// tie-break order for classifier keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Uploaded-document retrieval and ranking
    KnowledgeSearch,
    /// Live web search aggregation
    WebSearch,
    /// Time and location lookup
    TimeLocation,
    /// Log/metric bottleneck analysis
    PerformanceAnalysis,
    /// Generic answer without external data
    Direct,
}

impl Plan {
    pub const ALL: [Plan; 5] = [
        Plan::KnowledgeSearch,
        Plan::WebSearch,
        Plan::TimeLocation,
        Plan::PerformanceAnalysis,
        Plan::Direct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::KnowledgeSearch => "knowledge_search",
            Plan::WebSearch => "web_search",
            Plan::TimeLocation => "time_location",
            Plan::PerformanceAnalysis => "performance_analysis",
            Plan::Direct => "direct",
        }
    }

    /// Handler agent bound to this plan. The match is exhaustive, so
    /// the plan→handler table can never be incomplete.
    pub fn agent_name(&self) -> &'static str {
        match self {
            Plan::KnowledgeSearch => "rag-knowledge",
            Plan::WebSearch => "web-search",
            Plan::TimeLocation => "time-location",
            Plan::PerformanceAnalysis => "performance-analyzer",
            Plan::Direct => "direct-chat",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyword rule table for mapping free-form classifier output onto a
/// plan. Scanned in declaration order; the first plan with any keyword
/// appearing as a substring of the lowercased reply wins.
const PLAN_KEYWORDS: &[(Plan, &[&str])] = &[
    (Plan::KnowledgeSearch, &["knowledge", "document", "rag"]),
    (Plan::WebSearch, &["web", "internet"]),
    (Plan::TimeLocation, &["time", "location"]),
    (
        Plan::PerformanceAnalysis,
        &["performance", "metric", "bottleneck"],
    ),
    (Plan::Direct, &["direct"]),
];

/// Broad, unspecific requests to go online. Routed straight to web
/// search without consulting the classifier.
const BROAD_WEB_PHRASES: &[&str] = &[
    "search the web",
    "search the internet",
    "search online",
    "access the internet",
    "browse the web",
    "browse the internet",
    "use the internet",
    "look online",
    "look it up online",
];

/// Temporal/spatial questions answered by the time-location handler
const TIME_LOCATION_PHRASES: &[&str] = &[
    "what time is it",
    "what's the time",
    "whats the time",
    "current time",
    "what day is it",
    "what date is it",
    "today's date",
    "todays date",
    "where am i",
    "my location",
    "my current location",
    "what timezone",
    "what time zone",
];

/// System prompt instructing the classifier to emit one bare token
const PLAN_SYSTEM_PROMPT: &str = "You are a routing classifier for an assistant. \
Given the user's query and recent conversation, decide which capability should answer. \
Reply with EXACTLY ONE of these tokens and nothing else: \
knowledge_search, web_search, time_location, performance_analysis, direct.";

/// True when the prompt is a broad request to go online
pub fn is_broad_web_request(prompt: &str) -> bool {
    let q = prompt.to_lowercase();
    BROAD_WEB_PHRASES.iter().any(|p| q.contains(p))
}

/// True when the prompt asks about the current time, date, or location
pub fn is_time_location_request(prompt: &str) -> bool {
    let q = prompt.to_lowercase();
    TIME_LOCATION_PHRASES.iter().any(|p| q.contains(p))
}

/// Map free-form classifier output onto a plan via the keyword table.
/// Pure; returns `None` when no keyword matches.
pub fn match_plan_token(reply: &str) -> Option<Plan> {
    let text = reply.to_lowercase();
    for (plan, keywords) in PLAN_KEYWORDS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return Some(*plan);
        }
    }
    None
}

/// Trailing window of history offered to the classifier
pub fn recent_history(history: &[ChatMessage]) -> &[ChatMessage] {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    &history[start..]
}

/// Decides which plan answers the current turn
pub struct Planner {
    classifier: Option<std::sync::Arc<dyn Classifier>>,
}

impl Planner {
    pub fn new(classifier: Option<std::sync::Arc<dyn Classifier>>) -> Self {
        Self { classifier }
    }

    /// Choose the plan for this turn. Strict priority: deterministic
    /// overrides first, then the classifier, then the direct fallback.
    pub async fn plan(&self, prompt: &str, history: &[ChatMessage]) -> Plan {
        if is_broad_web_request(prompt) {
            info!("Deterministic override: broad web request");
            return Plan::WebSearch;
        }

        if is_time_location_request(prompt) {
            info!("Deterministic override: time/location request");
            return Plan::TimeLocation;
        }

        if let Some(classifier) = &self.classifier {
            let mut messages: Vec<ChatMessage> = recent_history(history).to_vec();
            messages.push(ChatMessage::user(prompt));

            match classifier.complete(PLAN_SYSTEM_PROMPT, &messages).await {
                Ok(reply) => match match_plan_token(&reply) {
                    Some(plan) => {
                        info!("Classifier selected plan: {}", plan);
                        return plan;
                    }
                    None => {
                        debug!("Classifier reply matched no plan: {:?}", reply);
                    }
                },
                Err(e) => {
                    warn!("Plan classifier unavailable, using fallback: {:#}", e);
                }
            }
        }

        Plan::Direct
    }
}
