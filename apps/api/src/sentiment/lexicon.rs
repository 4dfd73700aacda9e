//! Lexicon sentiment scorer in the VADER manner.
//!
//! Algorithm:
//! 1. Tokenize to lowercase words.
//! 2. Each lexicon word contributes its valence (roughly -4.0 to 4.0).
//!    - preceded by an intensifier → |valence| + 0.293
//!    - a negator within the 3 preceding tokens → valence × -0.74
//! 3. Each `!` (max 4) pushes the sum 0.292 further from zero.
//! 4. compound = s / sqrt(s² + 15), clamped to [-1, 1].

use async_trait::async_trait;

use crate::sentiment::{ClassifierError, SentimentClassifier, SentimentScore};

const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const INTENSIFIER_BOOST: f64 = 0.293;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NEGATION_WINDOW: usize = 3;

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("confident", 2.2),
    ("cool", 1.3),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("interesting", 1.7),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("nice", 1.8),
    ("passionate", 2.2),
    ("perfect", 2.7),
    ("pleased", 1.9),
    ("proud", 2.1),
    ("sure", 1.3),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("wonderful", 2.7),
    ("yes", 1.7),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("confused", -1.3),
    ("difficult", -1.5),
    ("disappointed", -1.9),
    ("dislike", -1.6),
    ("frustrated", -2.0),
    ("frustrating", -1.9),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("nervous", -1.1),
    ("poor", -2.1),
    ("sad", -2.1),
    ("stressed", -1.4),
    ("stupid", -2.4),
    ("terrible", -2.1),
    ("tired", -1.9),
    ("unfortunately", -1.4),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("useless", -1.8),
    ("waste", -1.8),
    ("worried", -1.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const INTENSIFIERS: &[&str] = &[
    "absolutely",
    "extremely",
    "highly",
    "incredibly",
    "really",
    "so",
    "super",
    "totally",
    "very",
];

const NEGATORS: &[&str] = &[
    "cannot", "neither", "never", "no", "nobody", "none", "nor", "not", "nothing", "nowhere",
];

/// Deterministic, dependency-free scorer. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentimentClassifier;

#[async_trait]
impl SentimentClassifier for LexiconSentimentClassifier {
    async fn score(&self, text: &str) -> Result<SentimentScore, ClassifierError> {
        Ok(SentimentScore {
            compound: compound_score(text),
        })
    }
}

/// Synchronous core of the lexicon scorer.
pub fn compound_score(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .collect();

    let mut sum = 0.0_f64;
    for (i, token) in tokens.iter().enumerate() {
        let Some(mut valence) = valence_of(token) else {
            continue;
        };

        if i > 0 && INTENSIFIERS.contains(&tokens[i - 1]) {
            valence += INTENSIFIER_BOOST * valence.signum();
        }

        let window_start = i.saturating_sub(NEGATION_WINDOW);
        if tokens[window_start..i].iter().any(|t| is_negator(t)) {
            valence *= NEGATION_SCALAR;
        }

        sum += valence;
    }

    if sum != 0.0 {
        let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        sum += EXCLAMATION_BOOST * bangs * sum.signum();
    }

    normalize(sum)
}

fn valence_of(token: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, v)| *v)
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
