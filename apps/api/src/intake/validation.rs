//! Field validation: pure, deterministic checks of raw candidate text.
//!
//! Each rule either returns the normalized value to store or a
//! `ValidationError` the state machine turns into a re-prompt.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::intake::fields::{Field, ValidatorRule};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Digits with optional separators; an optional leading `+`.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9()\-. ]*[0-9]$").expect("phone regex is valid"));

/// A number with an optional unit suffix ("5", "3.5 years", "10yrs").
static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([0-9]+(?:\.[0-9]+)?)\s*(?:years?|yrs?|yoe)?$").expect("years regex is valid")
});

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: Field },

    #[error("{field} has an invalid format: {requirement}")]
    InvalidFormat {
        field: Field,
        requirement: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Empty { field } | ValidationError::InvalidFormat { field, .. } => {
                *field
            }
        }
    }
}

/// Human-readable requirement for a rule, used in re-prompts.
pub fn requirement_for(rule: ValidatorRule) -> &'static str {
    match rule {
        ValidatorRule::None => "please enter a non-empty answer",
        ValidatorRule::EmailFormat => "please use the form name@example.com",
        ValidatorRule::PhoneFormat => {
            "please enter 7 to 15 digits; spaces, dashes, dots, parentheses and a leading + are allowed"
        }
        ValidatorRule::NumericNonNegative => "please enter a non-negative number, e.g. 3 or 4.5",
    }
}

/// Validates `raw` against the rule for `field`.
///
/// Blank input is always `Empty`, whatever the rule.
pub fn validate(field: Field, raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    let rule = field.rule();
    let invalid = || ValidationError::InvalidFormat {
        field,
        requirement: requirement_for(rule),
    };

    match rule {
        ValidatorRule::None => Ok(text.to_string()),
        ValidatorRule::EmailFormat => {
            if EMAIL_RE.is_match(text) && !text.contains("..") {
                Ok(text.to_string())
            } else {
                Err(invalid())
            }
        }
        ValidatorRule::PhoneFormat => normalize_phone(text).ok_or_else(invalid),
        ValidatorRule::NumericNonNegative => normalize_years(text).ok_or_else(invalid),
    }
}

fn normalize_phone(text: &str) -> Option<String> {
    if !PHONE_RE.is_match(text) {
        return None;
    }
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return None;
    }
    if text.starts_with('+') {
        Some(format!("+{digits}"))
    } else {
        Some(digits)
    }
}

fn normalize_years(text: &str) -> Option<String> {
    let caps = YEARS_RE.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    if !value.is_finite() || value.is_sign_negative() {
        return None;
    }
    // f64 Display drops a trailing ".0": "5.0" → "5", "3.50" → "3.5"
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field_trims() {
        assert_eq!(validate(Field::FullName, "  John Doe ").unwrap(), "John Doe");
    }

    #[test]
    fn test_plain_field_rejects_blank() {
        assert_eq!(
            validate(Field::Location, "   \n\t"),
            Err(ValidationError::Empty {
                field: Field::Location
            })
        );
    }

    #[test]
    fn test_blank_is_empty_for_formatted_fields_too() {
        for field in [Field::Email, Field::Phone, Field::YearsExperience] {
            assert_eq!(validate(field, ""), Err(ValidationError::Empty { field }));
        }
    }

    #[test]
    fn test_email_valid() {
        assert_eq!(validate(Field::Email, "john@doe.com").unwrap(), "john@doe.com");
        assert!(validate(Field::Email, "first.last+tag@mail.example.co.uk").is_ok());
    }

    #[test]
    fn test_email_double_at_rejected() {
        let err = validate(Field::Email, "john@@bad").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat {
                field: Field::Email,
                ..
            }
        ));
    }

    #[test]
    fn test_email_missing_tld_rejected() {
        assert!(validate(Field::Email, "john@doe").is_err());
        assert!(validate(Field::Email, "john@doe.c").is_err());
    }

    #[test]
    fn test_email_with_surrounding_text_rejected() {
        assert!(validate(Field::Email, "my email is john@doe.com").is_err());
    }

    #[test]
    fn test_email_double_dot_rejected() {
        assert!(validate(Field::Email, "john..doe@example.com").is_err());
    }

    #[test]
    fn test_phone_normalizes_separators() {
        assert_eq!(validate(Field::Phone, "+1 (555) 123-4567").unwrap(), "+15551234567");
        assert_eq!(validate(Field::Phone, "555.123.4567").unwrap(), "5551234567");
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert!(validate(Field::Phone, "123456").is_err());
        assert_eq!(validate(Field::Phone, "1234567").unwrap(), "1234567");
        assert_eq!(
            validate(Field::Phone, "123456789012345").unwrap(),
            "123456789012345"
        );
        assert!(validate(Field::Phone, "1234567890123456").is_err());
    }

    #[test]
    fn test_phone_rejects_letters() {
        assert!(validate(Field::Phone, "555-CALL-NOW").is_err());
        assert!(validate(Field::Phone, "call me maybe").is_err());
    }

    #[test]
    fn test_years_plain_numbers() {
        assert_eq!(validate(Field::YearsExperience, "5").unwrap(), "5");
        assert_eq!(validate(Field::YearsExperience, "0").unwrap(), "0");
        assert_eq!(validate(Field::YearsExperience, "3.5").unwrap(), "3.5");
        assert_eq!(validate(Field::YearsExperience, "4.0").unwrap(), "4");
    }

    #[test]
    fn test_years_with_units() {
        assert_eq!(validate(Field::YearsExperience, "5 years").unwrap(), "5");
        assert_eq!(validate(Field::YearsExperience, "1 year").unwrap(), "1");
        assert_eq!(validate(Field::YearsExperience, "10yrs").unwrap(), "10");
        assert_eq!(validate(Field::YearsExperience, "2 YOE").unwrap(), "2");
    }

    #[test]
    fn test_years_rejects_negative_and_words() {
        assert!(validate(Field::YearsExperience, "-1").is_err());
        assert!(validate(Field::YearsExperience, "five").is_err());
        assert!(validate(Field::YearsExperience, "about 5").is_err());
        assert!(validate(Field::YearsExperience, "NaN").is_err());
    }

    #[test]
    fn test_deterministic() {
        for _ in 0..3 {
            assert_eq!(validate(Field::Phone, "+44 20 7946 0958").unwrap(), "+442079460958");
        }
    }

    #[test]
    fn test_error_carries_field() {
        let err = validate(Field::Phone, "nope").unwrap_err();
        assert_eq!(err.field(), Field::Phone);
    }
}
