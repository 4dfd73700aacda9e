use std::sync::Arc;

use crate::dialogue::SessionRegistry;
use crate::transcript::TranscriptSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    /// Pluggable transcript destination. Default: FileTranscriptSink.
    pub sink: Arc<dyn TranscriptSink>,
}
