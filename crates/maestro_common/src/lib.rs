//! Maestro Common - shared types for the turn orchestration core.
//!
//! The turn entry/exit contract, the agent wire contract, and the
//! confidence vocabulary live here so that embedders and handler
//! implementations can depend on the schemas without pulling in the
//! orchestration machinery.

pub mod agent;
pub mod chat;
pub mod confidence;
pub mod error;

pub use agent::{dedup_sources, AgentRequest, AgentResponse, DEFAULT_AGENT_CONFIDENCE};
pub use chat::{ChatMessage, ChatRole, TurnRequest, TurnResult, LAST_SOURCES_KEY};
pub use confidence::{ConfidenceLevel, LOW_CONFIDENCE_THRESHOLD, MEDIUM_CONFIDENCE_THRESHOLD};
pub use error::MaestroError;
