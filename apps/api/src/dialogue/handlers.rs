use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialogue::session::{
    ClosureReason, InterviewAnswer, Phase, SessionId, SessionState, Turn,
};
use crate::errors::AppError;
use crate::intake::{Field, IntakeState};
use crate::interview::QuestionSet;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    pub turn: Turn,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub phase: Phase,
    pub turn: Turn,
}

/// Session view returned to clients. Unlike the transcript export this is
/// not anonymized: it goes back to the candidate's own UI.
#[derive(Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub phase: Phase,
    pub intake: IntakeState,
    pub current_field: Option<Field>,
    pub question_index: usize,
    pub profile: BTreeMap<Field, String>,
    pub questions: Option<QuestionSet>,
    pub answers: Vec<InterviewAnswer>,
    pub closure: Option<ClosureReason>,
    pub turns: Vec<Turn>,
}

impl From<SessionState> for SessionSnapshot {
    fn from(state: SessionState) -> Self {
        let profile = state
            .profile()
            .iter()
            .map(|(field, value)| (field, value.normalized.clone()))
            .collect();
        Self {
            session_id: state.session_id,
            phase: state.phase,
            intake: state.intake.state(),
            current_field: state.current_field(),
            question_index: state.question_index,
            profile,
            questions: state.questions,
            answers: state.answers,
            closure: state.closure,
            turns: state.turns,
        }
    }
}

#[derive(Serialize)]
pub struct SaveTranscriptResponse {
    pub path: String,
    pub transcript: String,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let (session_id, turn) = state.registry.create().await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id, turn }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.registry.snapshot(id).await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/v1/sessions/:id/messages
/// Blank text is passed through: the controller answers it with a re-prompt.
pub async fn handle_post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (phase, turn) = state.registry.handle_message(id, &req.text).await?;
    Ok(Json(MessageResponse { phase, turn }))
}

/// GET /api/v1/sessions/:id/transcript
pub async fn handle_get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let transcript = state.registry.export(id).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], transcript))
}

/// POST /api/v1/sessions/:id/transcript/save
pub async fn handle_save_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveTranscriptResponse>, AppError> {
    let transcript = state.registry.export(id).await?;
    let path = state.sink.save(id, &transcript).await?;
    Ok(Json(SaveTranscriptResponse { path, transcript }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.registry.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
