//! Error types for Maestro.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaestroError {
    #[error("Message cannot be empty.")]
    EmptyMessage,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
