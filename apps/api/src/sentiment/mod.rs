//! Sentiment: pluggable, trait-based scoring of candidate utterances.
//!
//! Default: `LexiconSentimentClassifier` (pure-Rust, deterministic, no network).
//! The controller only consumes the compound score; labels are derived here
//! with fixed thresholds. Sentiment is tone-only and never gates the dialogue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod lexicon;

pub use lexicon::LexiconSentimentClassifier;

/// Compound score at or above which a message is Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.30;
/// Compound score at or below which a message is Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.30;

/// Output of a classifier call. `compound` must lie in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub compound: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    /// Classifier failed; the turn carries no score.
    Unknown,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Lead-in for the next assistant prompt. Presentation only.
    pub fn prompt_prefix(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Great!",
            SentimentLabel::Negative => "Thanks for sharing.",
            SentimentLabel::Neutral | SentimentLabel::Unknown => "Thanks.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// Remote scorers only; the lexicon scorer cannot fail.
    #[allow(dead_code)]
    #[error("sentiment backend failed: {0}")]
    Backend(String),

    #[error("sentiment call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("compound score {0} is outside [-1, 1]")]
    OutOfRange(f64),
}

/// The sentiment classifier trait. Implement this to swap scorers without
/// touching the dialogue controller.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn score(&self, text: &str) -> Result<SentimentScore, ClassifierError>;
}

/// Label and score attached to a candidate turn.
///
/// Classifier failures degrade to `(Unknown, None)`.
pub fn label_score(result: Result<SentimentScore, ClassifierError>) -> (SentimentLabel, Option<f64>) {
    match result.and_then(check_range) {
        Ok(score) => (SentimentLabel::from_compound(score.compound), Some(score.compound)),
        Err(_) => (SentimentLabel::Unknown, None),
    }
}

fn check_range(score: SentimentScore) -> Result<SentimentScore, ClassifierError> {
    if score.compound.is_finite() && (-1.0..=1.0).contains(&score.compound) {
        Ok(score)
    } else {
        Err(ClassifierError::OutOfRange(score.compound))
    }
}
