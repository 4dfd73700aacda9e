use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dialogue::{DialogueError, RegistryError};
use crate::transcript::{SinkError, TranscriptError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid phase: {0}")]
    InvalidPhase(String),

    #[error("Question generation error: {0}")]
    Generation(String),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Storage error: {0}")]
    Storage(#[from] SinkError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => AppError::NotFound(format!("Session {id} not found")),
            RegistryError::Dialogue(DialogueError::InvalidPhaseOperation { phase }) => {
                AppError::InvalidPhase(format!("session is {phase:?}; no further messages accepted"))
            }
            RegistryError::Dialogue(DialogueError::Generation(e)) => {
                AppError::Generation(e.to_string())
            }
            RegistryError::Transcript(e) => AppError::Transcript(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InvalidPhase(msg) => (StatusCode::CONFLICT, "INVALID_PHASE", msg.clone()),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "Interview questions could not be prepared; the session has been closed"
                        .to_string(),
                )
            }
            AppError::Transcript(e) => {
                tracing::error!("Transcript error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TRANSCRIPT_ERROR",
                    "The transcript could not be produced".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::session::Phase;
    use crate::interview::GenerationError;

    #[test]
    fn test_registry_errors_map_to_status() {
        let cases = [
            (
                RegistryError::NotFound(uuid::Uuid::new_v4()),
                StatusCode::NOT_FOUND,
            ),
            (
                RegistryError::Dialogue(DialogueError::InvalidPhaseOperation {
                    phase: Phase::Closed,
                }),
                StatusCode::CONFLICT,
            ),
            (
                RegistryError::Dialogue(DialogueError::Generation(GenerationError::TooFew {
                    got: 1,
                })),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
