//! Confidence evaluation.
//!
//! Maps a handler's numeric score into a coarse band and applies the
//! short-prompt heuristic: prompts of two words or fewer always land
//! in the low band so the clarification loop kicks in.

use maestro_common::ConfidenceLevel;

/// Prompts at or below this many whitespace-delimited words are
/// treated as ambiguous regardless of the handler's score
pub const SHORT_PROMPT_MAX_WORDS: usize = 2;

/// Band a score. Pure and deterministic: `None` score yields `None`
/// (no clarification attempted); otherwise fixed thresholds apply and
/// a short prompt forces the low band.
pub fn band(score: Option<f64>, prompt_word_count: usize) -> Option<ConfidenceLevel> {
    let score = score?;
    if prompt_word_count <= SHORT_PROMPT_MAX_WORDS {
        return Some(ConfidenceLevel::Low);
    }
    Some(ConfidenceLevel::from_score(score))
}

/// Whitespace-delimited word count of a trimmed prompt
pub fn word_count(prompt: &str) -> usize {
    prompt.split_whitespace().count()
}
