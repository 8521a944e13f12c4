//! Maestro Core - conversational turn orchestration.
//!
//! Routes one conversational turn to the most appropriate handler
//! agent, scores the answer's trustworthiness, and asks clarifying
//! questions when trust is low instead of guessing.
//!
//! ## Flow (one pass per turn, no backtracking)
//!
//! ```text
//! TurnRequest → Planner → Dispatcher → agent call → Confidence band
//!                                                        ↓ (low)
//!                                              Follow-up questions
//! ```
//!
//! Handlers, the chat transport, and retrieval itself live elsewhere;
//! the core only decides who answers and how to interpret the result.

pub mod classifier;
pub mod config;
pub mod confidence;
pub mod dispatch;
pub mod followup;
pub mod logging;
pub mod orchestrator;
pub mod planner;

pub use classifier::{Classifier, FakeClassifier, OllamaClassifier};
pub use config::MaestroConfig;
pub use confidence::band;
pub use dispatch::{AgentCallError, AgentTransport, Dispatcher, FakeAgentTransport, HttpAgentClient};
pub use followup::MAX_FOLLOW_UP_QUESTIONS;
pub use orchestrator::Orchestrator;
pub use planner::{Plan, Planner};
