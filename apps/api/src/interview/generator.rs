//! Question generation: trait-based so the dialogue controller never talks
//! to a model directly.
//!
//! Default: `LlmQuestionGenerator` (chat completions via `LlmClient`).
//! The generator only produces candidate items; the count contract is
//! enforced by `interview::generate_question_set`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::interview::prompts::{build_question_prompt, question_system_prompt};
use crate::interview::GenerationError;
use crate::llm_client::{LlmClient, Sampling};

/// Leading bullets or numbering the model may add despite instructions.
static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•]+|\d+[.)]|Q\d+[.:)])\s*").expect("marker regex is valid"));

const QUESTION_SAMPLING: Sampling = Sampling {
    temperature: 0.4,
    top_p: 0.9,
    max_tokens: 400,
};

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Returns up to `n` questions in the order they should be asked.
    /// Implementations are not trusted to honor `n`.
    async fn generate(&self, tech_stack: &str, n: usize) -> Result<Vec<String>, GenerationError>;
}

/// Generates questions with a single chat-completion call.
pub struct LlmQuestionGenerator(pub LlmClient);

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(&self, tech_stack: &str, n: usize) -> Result<Vec<String>, GenerationError> {
        let prompt = build_question_prompt(tech_stack, n);
        let text = self
            .0
            .call_text(&prompt, &question_system_prompt(), QUESTION_SAMPLING)
            .await
            .map_err(|e| GenerationError::Llm(e.to_string()))?;

        let questions = parse_questions(&text)?;
        debug!("Question generator returned {} items", questions.len());
        Ok(questions)
    }
}

/// Parses a model response into question strings.
///
/// Accepts a JSON array of strings (or `{"questions": [...]}`); otherwise
/// falls back to the lines containing a `?`, with list markers removed.
/// Blank items are dropped. Non-string array items are `Malformed`.
pub fn parse_questions(text: &str) -> Result<Vec<String>, GenerationError> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => strings_from_array(items),
        Ok(Value::Object(mut map)) => match map.remove("questions") {
            Some(Value::Array(items)) => strings_from_array(items),
            _ => Err(GenerationError::Malformed(
                "JSON object without a `questions` array".to_string(),
            )),
        },
        _ => Ok(questions_from_lines(text)),
    }
}

fn strings_from_array(items: Vec<Value>) -> Result<Vec<String>, GenerationError> {
    let mut questions = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    questions.push(s.to_string());
                }
            }
            other => {
                return Err(GenerationError::Malformed(format!(
                    "expected a string item, got {other}"
                )))
            }
        }
    }
    Ok(questions)
}

fn questions_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains('?'))
        .map(|line| LIST_MARKER_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let qs = parse_questions(r#"["What is a closure?", "How does React reconcile?"]"#).unwrap();
        assert_eq!(qs, vec!["What is a closure?", "How does React reconcile?"]);
    }

    #[test]
    fn test_parse_json_object_with_questions_key() {
        let qs = parse_questions(r#"{"questions": ["A?", "B?", "C?"]}"#).unwrap();
        assert_eq!(qs.len(), 3);
    }

    #[test]
    fn test_parse_drops_blank_items() {
        let qs = parse_questions(r#"["A?", "  ", "B?"]"#).unwrap();
        assert_eq!(qs, vec!["A?", "B?"]);
    }

    #[test]
    fn test_parse_non_string_item_is_malformed() {
        assert!(matches!(
            parse_questions(r#"["A?", 42]"#),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_object_without_questions_is_malformed() {
        assert!(matches!(
            parse_questions(r#"{"items": []}"#),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_numbered_lines_fallback() {
        let text = "Here are your questions:\n\
                    1. What is the GIL in Python?\n\
                    2) How do React hooks manage state?\n\
                    - Explain list comprehensions?\n\
                    Good luck!";
        let qs = parse_questions(text).unwrap();
        assert_eq!(
            qs,
            vec![
                "What is the GIL in Python?",
                "How do React hooks manage state?",
                "Explain list comprehensions?",
            ]
        );
    }

    #[test]
    fn test_parse_plain_error_text_yields_nothing() {
        let qs = parse_questions("Missing API key.").unwrap();
        assert!(qs.is_empty());
    }
}
