//! Intake fields and the candidate profile they fill.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which validator a field is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorRule {
    None,
    EmailFormat,
    PhoneFormat,
    NumericNonNegative,
}

/// One of the seven intake slots.
///
/// Declaration order IS collection order. `Ord` is derived so that a
/// `BTreeMap<Field, _>` iterates in intake order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    DesiredPosition,
    Email,
    Phone,
    YearsExperience,
    Location,
    TechStack,
}

impl Field {
    /// Fixed collection order.
    pub const ORDER: [Field; 7] = [
        Field::FullName,
        Field::DesiredPosition,
        Field::Email,
        Field::Phone,
        Field::YearsExperience,
        Field::Location,
        Field::TechStack,
    ];

    #[cfg(test)]
    pub const COUNT: usize = Self::ORDER.len();

    /// Field at a given intake index, if in range.
    pub fn at(index: usize) -> Option<Field> {
        Self::ORDER.get(index).copied()
    }

    pub fn rule(&self) -> ValidatorRule {
        match self {
            Field::Email => ValidatorRule::EmailFormat,
            Field::Phone => ValidatorRule::PhoneFormat,
            Field::YearsExperience => ValidatorRule::NumericNonNegative,
            Field::FullName | Field::DesiredPosition | Field::Location | Field::TechStack => {
                ValidatorRule::None
            }
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::DesiredPosition => "desired_position",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::YearsExperience => "years_experience",
            Field::Location => "location",
            Field::TechStack => "tech_stack",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A value that has passed its field's validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedValue {
    /// Text as the candidate typed it (trimmed).
    pub raw: String,
    /// Validator output; this is what downstream consumers use.
    pub normalized: String,
}

/// Validated candidate answers, keyed by field.
///
/// Only `IntakeStateMachine` inserts, and only in `Field::ORDER`, so the map
/// always holds a prefix of the field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    values: BTreeMap<Field, CollectedValue>,
}

impl CandidateProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: Field, value: CollectedValue) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(|v| v.normalized.as_str())
    }

    #[cfg(test)]
    pub fn entry(&self, field: Field) -> Option<&CollectedValue> {
        self.values.get(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &CollectedValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_declaration() {
        for (i, field) in Field::ORDER.iter().enumerate() {
            assert_eq!(*field as usize, i);
            assert_eq!(Field::at(i), Some(*field));
        }
        assert_eq!(Field::at(7), None);
    }

    #[test]
    fn test_rules() {
        assert_eq!(Field::Email.rule(), ValidatorRule::EmailFormat);
        assert_eq!(Field::Phone.rule(), ValidatorRule::PhoneFormat);
        assert_eq!(Field::YearsExperience.rule(), ValidatorRule::NumericNonNegative);
        assert_eq!(Field::TechStack.rule(), ValidatorRule::None);
    }

    #[test]
    fn test_field_serializes_snake_case() {
        let json = serde_json::to_string(&Field::YearsExperience).unwrap();
        assert_eq!(json, r#""years_experience""#);
    }

    #[test]
    fn test_profile_iterates_in_intake_order() {
        let mut profile = CandidateProfile::new();
        let v = |s: &str| CollectedValue {
            raw: s.to_string(),
            normalized: s.to_string(),
        };
        profile.insert(Field::Email, v("a@b.io"));
        profile.insert(Field::FullName, v("Ada"));
        let fields: Vec<_> = profile.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![Field::FullName, Field::Email]);
    }
}
