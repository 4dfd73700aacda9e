//! In-process session registry and idle reaper.
//!
//! Each session sits behind its own `tokio::sync::Mutex`, held for a whole
//! handling step or export. The map lock is only held to look up, insert, or
//! remove entries, never across a controller call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dialogue::controller::{ControllerSettings, DialogueController, DialogueError};
use crate::dialogue::session::{Phase, SessionId, SessionState, Turn};
use crate::interview::QuestionGenerator;
use crate::sentiment::SentimentClassifier;
use crate::transcript::TranscriptError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error(transparent)]
    Dialogue(#[from] DialogueError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

/// What one reaper pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReapReport {
    pub closed: usize,
    pub dropped: usize,
}

type SharedController = Arc<Mutex<DialogueController>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SharedController>>,
    classifier: Arc<dyn SentimentClassifier>,
    generator: Arc<dyn QuestionGenerator>,
    settings: ControllerSettings,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        generator: Arc<dyn QuestionGenerator>,
        settings: ControllerSettings,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            classifier,
            generator,
            settings,
            idle_timeout,
        }
    }

    /// Creates a session, runs its greeting, and registers it.
    pub async fn create(&self) -> Result<(SessionId, Turn), RegistryError> {
        let id = Uuid::new_v4();
        let mut controller = DialogueController::new(
            id,
            Arc::clone(&self.classifier),
            Arc::clone(&self.generator),
            self.settings,
        );
        let greeting = controller.start()?;

        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(controller)));
        info!("Registered session {id}");
        Ok((id, greeting))
    }

    async fn get(&self, id: SessionId) -> Result<SharedController, RegistryError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    pub async fn handle_message(
        &self,
        id: SessionId,
        text: &str,
    ) -> Result<(Phase, Turn), RegistryError> {
        let session = self.get(id).await?;
        let mut controller = session.lock().await;
        let turn = controller.handle_message(text).await?;
        Ok((controller.state().phase, turn))
    }

    pub async fn snapshot(&self, id: SessionId) -> Result<SessionState, RegistryError> {
        let session = self.get(id).await?;
        let controller = session.lock().await;
        Ok(controller.state().clone())
    }

    pub async fn export(&self, id: SessionId) -> Result<String, RegistryError> {
        let session = self.get(id).await?;
        let controller = session.lock().await;
        Ok(controller.export_transcript()?)
    }

    pub async fn remove(&self, id: SessionId) -> Result<(), RegistryError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Removed session {id}");
                Ok(())
            }
            None => Err(RegistryError::NotFound(id)),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Closes open sessions idle past the timeout and drops closed sessions
    /// idle past twice the timeout. Sessions busy with a message are skipped.
    pub async fn reap_idle(&self, now: DateTime<Utc>) -> ReapReport {
        let entries: Vec<(SessionId, SharedController)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, s)| (*id, Arc::clone(s)))
            .collect();

        let mut report = ReapReport::default();
        let mut stale = Vec::new();

        for (id, session) in entries {
            let Ok(mut controller) = session.try_lock() else {
                continue;
            };
            let idle = (now - controller.last_activity_at())
                .to_std()
                .unwrap_or_default();

            if controller.state().is_closed() {
                if idle > self.idle_timeout * 2 {
                    stale.push(id);
                }
            } else if idle > self.idle_timeout && controller.close_idle().is_some() {
                report.closed += 1;
            }
        }

        if !stale.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in stale {
                if sessions.remove(&id).is_some() {
                    report.dropped += 1;
                }
            }
        }

        if report != ReapReport::default() {
            info!(
                "Reaper closed {} idle session(s), dropped {}",
                report.closed, report.dropped
            );
        }
        report
    }

    /// Runs `reap_idle` every `interval` until the runtime shuts down.
    pub fn spawn_reaper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = self.reap_idle(Utc::now()).await;
                debug!("Reaper pass: {:?}", report);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::controller::testing::{FixedClassifier, VALID_FIELDS};
    use crate::dialogue::session::ClosureReason;
    use crate::interview::testing::ScriptedGenerator;

    const IDLE: Duration = Duration::from_secs(1800);

    fn registry(generator: ScriptedGenerator) -> SessionRegistry {
        SessionRegistry::new(
            Arc::new(FixedClassifier(0.1)),
            Arc::new(generator),
            ControllerSettings {
                generation_timeout: Duration::from_secs(5),
                sentiment_timeout: Duration::from_secs(1),
            },
            IDLE,
        )
    }

    fn later(secs: i64) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::seconds(secs)
    }

    #[tokio::test]
    async fn test_create_registers_started_session() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (id, greeting) = reg.create().await.unwrap();
        assert!(greeting.text.contains("full name"));
        let state = reg.snapshot(id).await.unwrap();
        assert_eq!(state.phase, Phase::Collecting);
        assert_eq!(state.turns.len(), 1);
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (a, _) = reg.create().await.unwrap();
        let (b, _) = reg.create().await.unwrap();
        assert_ne!(a, b);

        reg.handle_message(a, "John Doe").await.unwrap();
        assert_eq!(reg.snapshot(a).await.unwrap().field_index(), 1);
        assert_eq!(reg.snapshot(b).await.unwrap().field_index(), 0);
    }

    #[tokio::test]
    async fn test_full_flow_through_registry() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (id, _) = reg.create().await.unwrap();
        for value in VALID_FIELDS {
            reg.handle_message(id, value).await.unwrap();
        }
        let (phase, turn) = reg.handle_message(id, "An answer").await.unwrap();
        assert_eq!(phase, Phase::Interviewing);
        assert_eq!(turn.text, "Question 2?");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let reg = registry(ScriptedGenerator::returning(3));
        let missing = Uuid::new_v4();
        assert!(matches!(
            reg.handle_message(missing, "hi").await,
            Err(RegistryError::NotFound(id)) if id == missing
        ));
        assert!(matches!(reg.export(missing).await, Err(RegistryError::NotFound(_))));
        assert!(matches!(reg.remove(missing).await, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_drops_session() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (id, _) = reg.create().await.unwrap();
        reg.remove(id).await.unwrap();
        assert!(matches!(reg.snapshot(id).await, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reaper_closes_idle_sessions_and_keeps_transcript() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (id, _) = reg.create().await.unwrap();
        reg.handle_message(id, "John Doe").await.unwrap();

        assert_eq!(reg.reap_idle(later(60)).await, ReapReport::default());

        let report = reg.reap_idle(later(1801)).await;
        assert_eq!(report, ReapReport { closed: 1, dropped: 0 });

        let state = reg.snapshot(id).await.unwrap();
        assert_eq!(state.phase, Phase::Closed);
        assert_eq!(state.closure, Some(ClosureReason::IdleTimeout));
        assert_eq!(state.profile().len(), 1);
        assert!(reg.export(id).await.unwrap().contains("idle_timeout"));
    }

    #[tokio::test]
    async fn test_reaper_drops_long_closed_sessions() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (id, _) = reg.create().await.unwrap();
        reg.handle_message(id, "bye").await.unwrap();

        assert_eq!(reg.reap_idle(later(1801)).await, ReapReport::default());
        let report = reg.reap_idle(later(3601)).await;
        assert_eq!(report, ReapReport { closed: 0, dropped: 1 });
        assert_eq!(reg.len().await, 0);
    }

    #[tokio::test]
    async fn test_closed_session_rejects_messages() {
        let reg = registry(ScriptedGenerator::returning(3));
        let (id, _) = reg.create().await.unwrap();
        reg.handle_message(id, "quit").await.unwrap();
        assert!(matches!(
            reg.handle_message(id, "hello").await,
            Err(RegistryError::Dialogue(DialogueError::InvalidPhaseOperation { .. }))
        ));
    }
}
