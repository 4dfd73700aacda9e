//! Interview: the three tech-stack questions asked after intake.
//!
//! The count contract lives here, at the boundary: a generator result is
//! verified, and a short or malformed result is retried exactly once before
//! the interview is abandoned. Never trust the generator directly.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

pub mod generator;
pub mod prompts;
pub mod question_set;

pub use generator::{LlmQuestionGenerator, QuestionGenerator};
pub use question_set::{QuestionSet, QUESTION_COUNT};

/// One retry after the first attempt.
const MAX_GENERATION_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("generator returned {got} usable questions, {} required", QUESTION_COUNT)]
    TooFew { got: usize },

    #[error("generator response was malformed: {0}")]
    Malformed(String),

    #[error("question generation call failed: {0}")]
    Llm(String),

    #[error("question generation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("question generation failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<GenerationError>,
    },
}

/// Requests `QUESTION_COUNT` questions for `tech_stack` and enforces the count.
///
/// Each attempt is bounded by `timeout`. A timeout, a call error, or an
/// unusable result counts as a failed attempt. After two failed attempts the
/// last error is returned wrapped in `Exhausted`.
pub async fn generate_question_set(
    generator: &dyn QuestionGenerator,
    tech_stack: &str,
    timeout: Duration,
) -> Result<QuestionSet, GenerationError> {
    let mut last_error = GenerationError::TooFew { got: 0 };

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        info!(
            "Requesting {} questions (attempt {}/{})",
            QUESTION_COUNT, attempt, MAX_GENERATION_ATTEMPTS
        );

        let result = match tokio::time::timeout(
            timeout,
            generator.generate(tech_stack, QUESTION_COUNT),
        )
        .await
        {
            Ok(result) => result.and_then(QuestionSet::from_generated),
            Err(_) => Err(GenerationError::Timeout {
                secs: timeout.as_secs(),
            }),
        };

        match result {
            Ok(set) => return Ok(set),
            Err(e) => {
                warn!(
                    "Question generation attempt {}/{} failed: {}",
                    attempt, MAX_GENERATION_ATTEMPTS, e
                );
                last_error = e;
            }
        }
    }

    Err(GenerationError::Exhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
        last: Box::new(last_error),
    })
}
