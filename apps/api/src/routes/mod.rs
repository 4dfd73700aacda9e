pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dialogue::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(handlers::handle_post_message),
        )
        .route(
            "/api/v1/sessions/:id/transcript",
            get(handlers::handle_get_transcript),
        )
        .route(
            "/api/v1/sessions/:id/transcript/save",
            post(handlers::handle_save_transcript),
        )
        .with_state(state)
}
