//! Transcript export with fixed-rule anonymization.
//!
//! Redaction rule:
//! - profile values for full_name / email / phone become `[name]` / `[email]` / `[phone]`
//! - every occurrence of those collected values (raw and normalized,
//!   case-insensitive) in turn texts and interview answers gets the same token
//! - email-shaped and phone-shaped strings in candidate turns and answers
//!   become `[email]` / `[phone]`, including ones from rejected attempts
//!
//! Everything else (other fields, turn order, timestamps, sentiment, questions)
//! is copied verbatim. This is placeholder substitution, not cryptographic
//! anonymization.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dialogue::session::{
    ClosureReason, InterviewAnswer, Phase, Role, SessionId, SessionState, Turn,
};
use crate::intake::Field;
use crate::interview::QuestionSet;

pub const NAME_PLACEHOLDER: &str = "[name]";
pub const EMAIL_PLACEHOLDER: &str = "[email]";
pub const PHONE_PLACEHOLDER: &str = "[phone]";

static EMAIL_LIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex is valid")
});

static PHONE_LIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d\-. ()]{5,}\d").expect("phone regex is valid"));

/// Digit count a phone-shaped run needs before it is scrubbed.
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to serialize transcript: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse transcript: {0}")]
    Parse(#[source] serde_json::Error),
}

/// The exported document. Serialized as pretty JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptExport {
    pub session_id: SessionId,
    pub phase: Phase,
    pub closure: Option<ClosureReason>,
    pub profile: BTreeMap<Field, String>,
    pub questions: Option<QuestionSet>,
    pub answers: Vec<InterviewAnswer>,
    pub turns: Vec<Turn>,
}

pub fn placeholder_for(field: Field) -> Option<&'static str> {
    match field {
        Field::FullName => Some(NAME_PLACEHOLDER),
        Field::Email => Some(EMAIL_PLACEHOLDER),
        Field::Phone => Some(PHONE_PLACEHOLDER),
        _ => None,
    }
}

/// Builds the anonymized document for a session at any point in its life.
/// Deterministic: the same state always yields the same document.
pub fn build(state: &SessionState) -> TranscriptExport {
    let redactor = Redactor::for_state(state);

    let profile = state
        .profile()
        .iter()
        .map(|(field, value)| {
            let shown = placeholder_for(field)
                .map(str::to_string)
                .unwrap_or_else(|| value.normalized.clone());
            (field, shown)
        })
        .collect();

    let turns = state
        .turns
        .iter()
        .map(|turn| Turn {
            text: redactor.apply(&turn.text, turn.role == Role::Candidate),
            ..turn.clone()
        })
        .collect();

    let answers = state
        .answers
        .iter()
        .map(|a| InterviewAnswer {
            answer: redactor.apply(&a.answer, true),
            ..a.clone()
        })
        .collect();

    TranscriptExport {
        session_id: state.session_id,
        phase: state.phase,
        closure: state.closure,
        profile,
        questions: state.questions.clone(),
        answers,
        turns,
    }
}

/// Renders the anonymized transcript as a text blob.
pub fn export(state: &SessionState) -> Result<String, TranscriptError> {
    serde_json::to_string_pretty(&build(state)).map_err(TranscriptError::Serialize)
}

/// Reads an exported blob back.
#[allow(dead_code)]
pub fn parse_export(text: &str) -> Result<TranscriptExport, TranscriptError> {
    serde_json::from_str(text).map_err(TranscriptError::Parse)
}

/// Literal-value substitutions, longest value first so that a value
/// containing another is replaced whole.
struct Redactor {
    rules: Vec<(Regex, &'static str)>,
}

impl Redactor {
    fn for_state(state: &SessionState) -> Self {
        let mut values: Vec<(String, &'static str)> = Vec::new();
        for (field, value) in state.profile().iter() {
            let Some(token) = placeholder_for(field) else {
                continue;
            };
            for candidate in [&value.raw, &value.normalized] {
                if !candidate.is_empty() && !values.iter().any(|(v, _)| v == candidate) {
                    values.push((candidate.clone(), token));
                }
            }
        }
        values.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let rules = values
            .into_iter()
            .filter_map(|(value, token)| literal_pattern(&value).map(|re| (re, token)))
            .collect();
        Self { rules }
    }

    fn apply(&self, text: &str, scrub_patterns: bool) -> String {
        let mut out = text.to_string();
        for (re, token) in &self.rules {
            out = re.replace_all(&out, *token).into_owned();
        }
        if scrub_patterns {
            out = EMAIL_LIKE_RE
                .replace_all(&out, EMAIL_PLACEHOLDER)
                .into_owned();
            out = PHONE_LIKE_RE
                .replace_all(&out, |caps: &regex::Captures<'_>| {
                    let digits = caps[0].chars().filter(char::is_ascii_digit).count();
                    if PHONE_DIGITS.contains(&digits) {
                        PHONE_PLACEHOLDER.to_string()
                    } else {
                        caps[0].to_string()
                    }
                })
                .into_owned();
        }
        out
    }
}

/// Matches `value` literally and case-insensitively, on word boundaries where
/// the value starts or ends with a word character ("Al" must not hit "Algorithms").
fn literal_pattern(value: &str) -> Option<Regex> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let starts = value.chars().next().is_some_and(is_word);
    let ends = value.chars().last().is_some_and(is_word);
    let pattern = format!(
        "(?i){}{}{}",
        if starts { r"\b" } else { "" },
        regex::escape(value),
        if ends { r"\b" } else { "" }
    );
    Regex::new(&pattern).ok()
}
