//! Anonymized transcript export and persistence.

pub mod builder;
pub mod sink;

pub use builder::{export, TranscriptError};
pub use sink::{FileTranscriptSink, SinkError, TranscriptSink};
