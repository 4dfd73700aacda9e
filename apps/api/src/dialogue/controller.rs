//! Dialogue controller: the top-level state machine for one candidate session.
//!
//! Flow per candidate message:
//!   reject if CLOSED → classify sentiment → record candidate turn →
//!   exit keyword? → route to intake or interview → record one assistant turn.
//!
//! Sentiment is attached to every candidate turn but never consulted by
//! validation or transitions. The question generator is invoked only at the
//! COLLECTING → INTERVIEWING edge (once, plus one retry if its result is unusable).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::dialogue::prompts::{closing_message, is_exit_request};
use crate::dialogue::session::{
    ClosureReason, InterviewAnswer, Phase, SessionId, SessionState, Turn,
};
use crate::intake::state_machine::IntakeError;
use crate::intake::{Field, IntakeStep};
use crate::interview::{generate_question_set, GenerationError, QuestionGenerator};
use crate::sentiment::{label_score, ClassifierError, SentimentClassifier, SentimentScore};
use crate::transcript::{self, TranscriptError};

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("operation not allowed in phase {phase:?}")]
    InvalidPhaseOperation { phase: Phase },

    #[error("interview cannot proceed: {0}")]
    Generation(#[from] GenerationError),
}

/// Bounds on the two external calls.
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub generation_timeout: Duration,
    pub sentiment_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(60),
            sentiment_timeout: Duration::from_secs(5),
        }
    }
}

/// Owns one `SessionState` exclusively. Callers serialize access (see `SessionRegistry`).
pub struct DialogueController {
    state: SessionState,
    classifier: Arc<dyn SentimentClassifier>,
    generator: Arc<dyn QuestionGenerator>,
    settings: ControllerSettings,
}

impl DialogueController {
    pub fn new(
        session_id: SessionId,
        classifier: Arc<dyn SentimentClassifier>,
        generator: Arc<dyn QuestionGenerator>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            state: SessionState::new(session_id, Utc::now()),
            classifier,
            generator,
            settings,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// GREETING → COLLECTING. Emits the greeting with the first field prompt.
    pub fn start(&mut self) -> Result<Turn, DialogueError> {
        let greeting = self.state.intake.start().map_err(|_| self.invalid_phase())?;
        self.state.phase = Phase::Collecting;
        info!("Session {} started", self.state.session_id);
        Ok(self.emit(greeting))
    }

    /// Handles one candidate message to completion and returns the assistant reply.
    ///
    /// - CLOSED → `InvalidPhaseOperation`, state untouched
    /// - field validation failures are not errors: the reply is a re-prompt
    /// - `Generation` means intake finished but the interview could not start;
    ///   the session is closed with `GenerationFailed` and intake data kept
    pub async fn handle_message(&mut self, text: &str) -> Result<Turn, DialogueError> {
        if self.state.is_closed() {
            warn!(
                "Rejected message for closed session {}",
                self.state.session_id
            );
            return Err(self.invalid_phase());
        }

        if self.state.phase == Phase::Greeting {
            self.start()?;
        }

        let (label, score) = label_score(self.classify(text).await);
        let now = Utc::now();
        self.state
            .turns
            .push(Turn::candidate(text, now, label, score));
        self.state.last_activity_at = now;
        debug!(
            "Session {} candidate turn: phase={:?} sentiment={:?}",
            self.state.session_id, self.state.phase, label
        );

        if is_exit_request(text) {
            return Ok(self.close(ClosureReason::CandidateExited));
        }

        match self.state.phase {
            Phase::Collecting => self.handle_intake(text).await,
            Phase::Interviewing => Ok(self.handle_answer(text)),
            Phase::Greeting | Phase::Closed => Err(self.invalid_phase()),
        }
    }

    /// Closes an open session for inactivity. Returns the closing turn, or
    /// `None` if the session was already closed.
    pub fn close_idle(&mut self) -> Option<Turn> {
        if self.state.is_closed() {
            return None;
        }
        Some(self.close(ClosureReason::IdleTimeout))
    }

    /// Last time a candidate message (or session creation) touched the session.
    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.state.last_activity_at
    }

    /// Anonymized transcript of the session as it stands right now.
    pub fn export_transcript(&self) -> Result<String, TranscriptError> {
        transcript::export(&self.state)
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore, ClassifierError> {
        let timeout = self.settings.sentiment_timeout;
        let result = match tokio::time::timeout(timeout, self.classifier.score(text)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout {
                secs: timeout.as_secs(),
            }),
        };
        if let Err(e) = &result {
            warn!(
                "Sentiment unavailable for session {}: {}",
                self.state.session_id, e
            );
        }
        result
    }

    async fn handle_intake(&mut self, text: &str) -> Result<Turn, DialogueError> {
        let step = self.state.intake.submit(text).map_err(|e| match e {
            IntakeError::AlreadyStarted | IntakeError::NotCollecting(_) => self.invalid_phase(),
        })?;

        match step {
            IntakeStep::Advanced { stored, next, prompt } => {
                debug!(
                    "Session {} stored {}, next {}",
                    self.state.session_id, stored, next
                );
                Ok(self.emit_prompt(&prompt))
            }
            IntakeStep::Rejected { error, prompt } => {
                debug!(
                    "Session {} rejected {}: {}",
                    self.state.session_id,
                    error.field(),
                    error
                );
                Ok(self.emit_prompt(&prompt))
            }
            IntakeStep::Completed { .. } => self.begin_interview().await,
        }
    }

    async fn begin_interview(&mut self) -> Result<Turn, DialogueError> {
        let tech_stack = self
            .state
            .profile()
            .get(Field::TechStack)
            .unwrap_or_default()
            .to_string();
        info!(
            "Session {} intake complete; generating questions",
            self.state.session_id
        );

        match generate_question_set(
            self.generator.as_ref(),
            &tech_stack,
            self.settings.generation_timeout,
        )
        .await
        {
            Ok(questions) => {
                let first = questions.get(0).unwrap_or_default().to_string();
                self.state.questions = Some(questions);
                self.state.question_index = 0;
                self.state.phase = Phase::Interviewing;
                info!("Session {} interviewing", self.state.session_id);
                Ok(self.emit(first))
            }
            Err(e) => {
                error!(
                    "Session {} question generation failed: {}",
                    self.state.session_id, e
                );
                self.close(ClosureReason::GenerationFailed);
                Err(DialogueError::Generation(e))
            }
        }
    }

    fn handle_answer(&mut self, text: &str) -> Turn {
        let index = self.state.question_index;
        let question = self
            .state
            .questions
            .as_ref()
            .and_then(|q| q.get(index))
            .unwrap_or_default()
            .to_string();
        self.state.answers.push(InterviewAnswer {
            question_index: index,
            question,
            answer: text.to_string(),
        });
        self.state.question_index = index + 1;

        let next = self
            .state
            .questions
            .as_ref()
            .and_then(|q| q.get(index + 1))
            .map(str::to_string);
        match next {
            Some(question) => self.emit(question),
            None => self.close(ClosureReason::Completed),
        }
    }

    fn close(&mut self, reason: ClosureReason) -> Turn {
        let turn = self.emit(closing_message(reason));
        self.state.phase = Phase::Closed;
        self.state.closure = Some(reason);
        info!(
            "Session {} closed: {:?}",
            self.state.session_id, reason
        );
        turn
    }

    /// Field prompt with the sentiment-based lead-in.
    fn emit_prompt(&mut self, prompt: &str) -> Turn {
        let prefix = self.state.last_candidate_label().prompt_prefix();
        self.emit(format!("{prefix} {prompt}"))
    }

    fn emit(&mut self, text: impl Into<String>) -> Turn {
        let turn = Turn::assistant(text, Utc::now());
        self.state.turns.push(turn.clone());
        turn
    }

    fn invalid_phase(&self) -> DialogueError {
        DialogueError::InvalidPhaseOperation {
            phase: self.state.phase,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::{ControllerSettings, DialogueController};
    use crate::interview::testing::ScriptedGenerator;
    use crate::sentiment::{ClassifierError, SentimentClassifier, SentimentScore};

    pub struct FixedClassifier(pub f64);

    #[async_trait]
    impl SentimentClassifier for FixedClassifier {
        async fn score(&self, _text: &str) -> Result<SentimentScore, ClassifierError> {
            Ok(SentimentScore { compound: self.0 })
        }
    }

    pub struct FailingClassifier;

    #[async_trait]
    impl SentimentClassifier for FailingClassifier {
        async fn score(&self, _text: &str) -> Result<SentimentScore, ClassifierError> {
            Err(ClassifierError::Backend("unavailable".into()))
        }
    }

    pub struct HangingClassifier;

    #[async_trait]
    impl SentimentClassifier for HangingClassifier {
        async fn score(&self, _text: &str) -> Result<SentimentScore, ClassifierError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(SentimentScore { compound: 0.9 })
        }
    }

    pub const VALID_FIELDS: [&str; 7] = [
        "John Doe",
        "Backend Engineer",
        "john@doe.com",
        "+1 555 123 4567",
        "5 years",
        "Austin, USA",
        "Python, React",
    ];

    pub fn controller_with(
        classifier: impl SentimentClassifier + 'static,
        generator: ScriptedGenerator,
    ) -> DialogueController {
        DialogueController::new(
            Uuid::new_v4(),
            Arc::new(classifier),
            Arc::new(generator),
            ControllerSettings {
                generation_timeout: Duration::from_secs(5),
                sentiment_timeout: Duration::from_secs(1),
            },
        )
    }

    pub async fn complete_intake(controller: &mut DialogueController) {
        for value in VALID_FIELDS {
            let _ = controller.handle_message(value).await;
        }
    }
}
