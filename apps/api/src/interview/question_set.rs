//! QuestionSet: the three interview questions, fixed once created.

use serde::{Deserialize, Serialize};

use crate::interview::GenerationError;

/// Number of technical questions asked per interview.
pub const QUESTION_COUNT: usize = 3;

/// Exactly `QUESTION_COUNT` questions, in the order the generator returned them.
///
/// The array type makes any other length unrepresentable, including on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet([String; QUESTION_COUNT]);

impl QuestionSet {
    /// Builds a set from a generator result.
    ///
    /// - fewer than 3 items → `TooFew` (never padded)
    /// - more than 3 items → first 3 kept, in returned order
    /// - a blank item among the first 3 → `Malformed`
    pub fn from_generated(items: Vec<String>) -> Result<Self, GenerationError> {
        if items.len() < QUESTION_COUNT {
            return Err(GenerationError::TooFew { got: items.len() });
        }

        let mut iter = items.into_iter();
        let mut take = || iter.next().unwrap_or_default();
        let questions = [take(), take(), take()];

        if let Some(pos) = questions.iter().position(|q| q.trim().is_empty()) {
            return Err(GenerationError::Malformed(format!(
                "question {} is blank",
                pos + 1
            )));
        }

        Ok(Self(questions))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Question {i}?")).collect()
    }

    #[test]
    fn test_zero_and_one_items_rejected() {
        assert_eq!(
            QuestionSet::from_generated(items(0)),
            Err(GenerationError::TooFew { got: 0 })
        );
        assert_eq!(
            QuestionSet::from_generated(items(1)),
            Err(GenerationError::TooFew { got: 1 })
        );
        assert_eq!(
            QuestionSet::from_generated(items(2)),
            Err(GenerationError::TooFew { got: 2 })
        );
    }

    #[test]
    fn test_exactly_three_kept_verbatim() {
        let set = QuestionSet::from_generated(items(3)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["Question 1?", "Question 2?", "Question 3?"]
        );
    }

    #[test]
    fn test_five_items_truncated_in_order() {
        let set = QuestionSet::from_generated(items(5)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0), Some("Question 1?"));
        assert_eq!(set.get(2), Some("Question 3?"));
        assert_eq!(set.get(3), None);
    }

    #[test]
    fn test_blank_item_is_malformed() {
        let result = QuestionSet::from_generated(vec![
            "What is ownership?".into(),
            "  ".into(),
            "What is a trait?".into(),
        ]);
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        assert!(serde_json::from_str::<QuestionSet>(r#"["a?", "b?"]"#).is_err());
        assert!(serde_json::from_str::<QuestionSet>(r#"["a?", "b?", "c?"]"#).is_ok());
    }
}
