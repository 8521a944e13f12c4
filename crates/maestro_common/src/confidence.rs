//! Confidence banding vocabulary.
//!
//! Numeric scores from handlers are bucketed into three bands with
//! fixed thresholds. Anything below 0.70 is "low" so clarification is
//! asked for more often than not.

use serde::{Deserialize, Serialize};

/// Scores below this band as low
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.70;

/// Scores below this (and at or above the low threshold) band as medium
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.90;

/// Coarse confidence band derived from a handler's numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Band a numeric score with the fixed thresholds
    pub fn from_score(score: f64) -> Self {
        if score < LOW_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::Low
        } else if score < MEDIUM_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
