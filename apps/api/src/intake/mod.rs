// Intake: ordered collection and validation of the seven candidate fields.

pub mod fields;
pub mod prompts;
pub mod state_machine;
pub mod validation;

pub use fields::{CandidateProfile, Field};
pub use state_machine::{IntakeState, IntakeStateMachine, IntakeStep};
