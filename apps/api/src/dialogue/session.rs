use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intake::{CandidateProfile, Field, IntakeStateMachine};
use crate::interview::QuestionSet;
use crate::sentiment::SentimentLabel;

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Greeting,
    Collecting,
    Interviewing,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    /// All three questions answered.
    Completed,
    /// Candidate sent an exit keyword.
    CandidateExited,
    /// No message within the idle timeout.
    IdleTimeout,
    /// Question generation failed after its retry.
    GenerationFailed,
}

/// One exchange unit. Assistant turns never carry sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment_label: Option<SentimentLabel>,
    pub sentiment_score: Option<f64>,
}

impl Turn {
    pub fn assistant(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp,
            sentiment_label: None,
            sentiment_score: None,
        }
    }

    pub fn candidate(
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        label: SentimentLabel,
        score: Option<f64>,
    ) -> Self {
        Self {
            role: Role::Candidate,
            text: text.into(),
            timestamp,
            sentiment_label: Some(label),
            sentiment_score: score,
        }
    }
}

/// A candidate's reply to one interview question. Not graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
}

/// Everything known about one candidate session.
///
/// Mutated only by `DialogueController`; frozen once `phase == Closed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub phase: Phase,
    pub intake: IntakeStateMachine,
    /// Append-only, in creation order.
    pub turns: Vec<Turn>,
    pub questions: Option<QuestionSet>,
    pub question_index: usize,
    pub answers: Vec<InterviewAnswer>,
    pub closure: Option<ClosureReason>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            phase: Phase::Greeting,
            intake: IntakeStateMachine::new(),
            turns: Vec::new(),
            questions: None,
            question_index: 0,
            answers: Vec::new(),
            closure: None,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn profile(&self) -> &CandidateProfile {
        self.intake.profile()
    }

    #[cfg(test)]
    pub fn field_index(&self) -> usize {
        self.intake.field_index()
    }

    pub fn current_field(&self) -> Option<Field> {
        self.intake.current_field()
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// Most recent candidate sentiment, used to pick the prompt lead-in.
    pub fn last_candidate_label(&self) -> SentimentLabel {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Candidate)
            .and_then(|t| t.sentiment_label)
            .unwrap_or(SentimentLabel::Neutral)
    }
}
