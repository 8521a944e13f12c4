//! Follow-up question generation.
//!
//! When a turn lands in the low confidence band, the classifier is
//! asked (in a different mode) for a few short clarifying questions.
//! This path is deliberately defensive: any failure yields an empty
//! list and the turn completes unchanged.

use maestro_common::ChatMessage;
use tracing::warn;

use crate::classifier::Classifier;
use crate::planner::recent_history;

/// Cap on clarifying questions per turn
pub const MAX_FOLLOW_UP_QUESTIONS: usize = 3;

fn follow_up_system_prompt(max: usize) -> String {
    format!(
        "You are helping improve answer quality by asking clarifying questions.\n\
         Given the user's last query and recent conversation, generate \
         {} SHORT clarifying questions that would help you answer better.\n\
         Return ONLY the list of questions, one per line, without numbering or extra text.",
        max
    )
}

/// Parse raw classifier output into questions: split on line breaks,
/// trim leading bullets/dashes/whitespace, drop empties, cap at `max`.
/// Pure; order preserved from generation.
pub fn parse_questions(text: &str, max: usize) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '*' || c == '\u{2022}'))
        .filter(|line| !line.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Ask the classifier for up to `max` clarifying questions.
///
/// Never fails the turn: a missing or unreachable classifier, a
/// timeout, or malformed output all come back as an empty list.
pub async fn follow_up_questions(
    classifier: Option<&dyn Classifier>,
    prompt: &str,
    history: &[ChatMessage],
    max: usize,
) -> Vec<String> {
    let Some(classifier) = classifier else {
        return Vec::new();
    };

    let mut messages: Vec<ChatMessage> = recent_history(history).to_vec();
    messages.push(ChatMessage::user(format!("User query: {}", prompt)));

    match classifier
        .complete(&follow_up_system_prompt(max), &messages)
        .await
    {
        Ok(text) => parse_questions(&text, max),
        Err(e) => {
            warn!("Follow-up generation failed: {:#}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FakeClassifier;

    #[test]
    fn test_parse_plain_lines() {
        let text = "What framework is it?\nWhich environment?\n";
        assert_eq!(
            parse_questions(text, 3),
            vec!["What framework is it?", "Which environment?"]
        );
    }

    #[test]
    fn test_parse_trims_bullets_and_blanks() {
        let text = "- What service?\n\n  * Which region?\n\u{2022} Since when?\n";
        assert_eq!(
            parse_questions(text, 3),
            vec!["What service?", "Which region?", "Since when?"]
        );
    }

    #[test]
    fn test_parse_caps_at_max() {
        let text = "a?\nb?\nc?\nd?\ne?";
        assert_eq!(parse_questions(text, 3).len(), 3);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_questions("", 3).is_empty());
        assert!(parse_questions("\n \n---\n", 3).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_classifier_yields_empty() {
        let classifier = FakeClassifier::failing();
        let questions =
            follow_up_questions(Some(&classifier), "hi", &[], MAX_FOLLOW_UP_QUESTIONS).await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_classifier_yields_empty() {
        let questions = follow_up_questions(None, "hi", &[], MAX_FOLLOW_UP_QUESTIONS).await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_generation_happy_path() {
        let classifier =
            FakeClassifier::new().reply("- Which app?\n- What time window?\n- Any recent deploys?");
        let questions =
            follow_up_questions(Some(&classifier), "slow", &[], MAX_FOLLOW_UP_QUESTIONS).await;
        assert_eq!(
            questions,
            vec!["Which app?", "What time window?", "Any recent deploys?"]
        );
    }
}
