//! Dialogue: the per-session conversation and the registry that hosts sessions.

pub mod controller;
pub mod handlers;
pub mod prompts;
pub mod registry;
pub mod session;

pub use controller::{ControllerSettings, DialogueError};
pub use registry::{RegistryError, SessionRegistry};
