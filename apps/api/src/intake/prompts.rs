// Candidate-facing copy for the intake phase.

use crate::intake::fields::{Field, ValidatorRule};
use crate::intake::validation::{requirement_for, ValidationError};

pub const GREETING: &str = "Hello! I'm the TalentScout Hiring Assistant. \
    I'll gather a few details about you, one at a time, and then ask three \
    technical questions based on your tech stack. You can type \"exit\" at any \
    point to end the conversation.";

/// Question asked to collect a field.
pub fn field_prompt(field: Field) -> &'static str {
    match field {
        Field::FullName => "What's your full name?",
        Field::DesiredPosition => "Which position(s) are you targeting?",
        Field::Email => "Please share your email address.",
        Field::Phone => "What's the best phone number to reach you?",
        Field::YearsExperience => "How many years of professional experience do you have?",
        Field::Location => "What's your current location (city, country)?",
        Field::TechStack => {
            "List your tech stack (languages, frameworks, databases, tools)."
        }
    }
}

/// Re-prompt for the same field after a failed validation.
pub fn retry_prompt(error: &ValidationError) -> String {
    let field = error.field();
    let requirement = match error {
        ValidationError::Empty { .. } => requirement_for(ValidatorRule::None),
        ValidationError::InvalidFormat { requirement, .. } => *requirement,
    };
    format!(
        "That doesn't look right for {}: {}. {}",
        field_label(field),
        requirement,
        field_prompt(field)
    )
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::FullName => "your name",
        Field::DesiredPosition => "the position",
        Field::Email => "an email address",
        Field::Phone => "a phone number",
        Field::YearsExperience => "years of experience",
        Field::Location => "your location",
        Field::TechStack => "your tech stack",
    }
}
