//! Intake state machine: collects the seven fields strictly in order.
//!
//! One submission fills at most one field: a message that happens to contain
//! values for later fields (e.g. "Jane, jane@x.io, 555 1234") only ever
//! answers the current field. No look-ahead extraction, no backfill.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intake::fields::{CandidateProfile, CollectedValue, Field};
use crate::intake::prompts::{field_prompt, retry_prompt, GREETING};
use crate::intake::validation::{validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "field_index", rename_all = "snake_case")]
pub enum IntakeState {
    Greeting,
    Collecting(usize),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("intake has already started")]
    AlreadyStarted,

    #[error("intake is not collecting (state: {0:?})")]
    NotCollecting(IntakeState),
}

/// Result of one `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeStep {
    /// Value stored; ask for the next field.
    Advanced { stored: Field, next: Field, prompt: String },
    /// Validation failed; ask for the same field again.
    Rejected { error: ValidationError, prompt: String },
    /// Last field stored; intake is complete.
    Completed { stored: Field },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeStateMachine {
    state: IntakeState,
    profile: CandidateProfile,
}

impl Default for IntakeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeStateMachine {
    pub fn new() -> Self {
        Self {
            state: IntakeState::Greeting,
            profile: CandidateProfile::new(),
        }
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    /// Number of validated fields; equals the current field index while collecting.
    #[cfg(test)]
    pub fn field_index(&self) -> usize {
        match self.state {
            IntakeState::Greeting => 0,
            IntakeState::Collecting(i) => i,
            IntakeState::Done => Field::COUNT,
        }
    }

    /// Field the next submission answers.
    pub fn current_field(&self) -> Option<Field> {
        match self.state {
            IntakeState::Collecting(i) => Field::at(i),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.state == IntakeState::Done
    }

    /// GREETING → COLLECTING(0). Returns the greeting plus the first field prompt.
    pub fn start(&mut self) -> Result<String, IntakeError> {
        if self.state != IntakeState::Greeting {
            return Err(IntakeError::AlreadyStarted);
        }
        self.state = IntakeState::Collecting(0);
        Ok(format!("{GREETING}\n\nTo start: {}", field_prompt(Field::FullName)))
    }

    /// Validates `raw` against the current field only.
    ///
    /// Retries are unlimited; a rejection leaves the state and the profile untouched.
    pub fn submit(&mut self, raw: &str) -> Result<IntakeStep, IntakeError> {
        let IntakeState::Collecting(index) = self.state else {
            return Err(IntakeError::NotCollecting(self.state));
        };
        let field = Field::at(index).ok_or(IntakeError::NotCollecting(self.state))?;

        let normalized = match validate(field, raw) {
            Ok(value) => value,
            Err(error) => {
                let prompt = retry_prompt(&error);
                return Ok(IntakeStep::Rejected { error, prompt });
            }
        };

        self.profile.insert(
            field,
            CollectedValue {
                raw: raw.trim().to_string(),
                normalized,
            },
        );

        let next_index = index + 1;
        debug_assert_eq!(self.profile.len(), next_index);

        match Field::at(next_index) {
            Some(next) => {
                self.state = IntakeState::Collecting(next_index);
                Ok(IntakeStep::Advanced {
                    stored: field,
                    next,
                    prompt: field_prompt(next).to_string(),
                })
            }
            None => {
                self.state = IntakeState::Done;
                Ok(IntakeStep::Completed { stored: field })
            }
        }
    }
}
