use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::types::Grade;

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionName {
    name: String,
}

impl QuestionName {
    pub fn new(name: String) -> Self {
        Self { name }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QuestionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// A case-insensitive substring used to bind a submission file to a question.
/// Always held lowercase so matching is a plain `contains`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchingKey {
    key: String,
}

impl MatchingKey {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for MatchingKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.key.fmt(f)
    }
}

/// A graded assignment item. Immutable once loaded; the catalog shares it
/// across every student record behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Question {
    name: QuestionName,
    keys: Vec<MatchingKey>,
    possible_grades: Vec<Grade>,
    default_grade: Grade,
    base_code: String,
}

impl Question {
    pub fn new(
        name: QuestionName,
        keys: Vec<MatchingKey>,
        possible_grades: Vec<Grade>,
        default_grade: Grade,
        base_code: String,
    ) -> Result<Self> {
        if keys.is_empty() {
            bail!("question `{name}` has no matching keys");
        }
        if possible_grades.is_empty() {
            bail!("question `{name}` has no possible grades");
        }
        if !possible_grades.contains(&default_grade) {
            bail!(
                "default grade `{default_grade}` of question `{name}` is not among its possible grades"
            );
        }

        Ok(Self {
            name,
            keys,
            possible_grades,
            default_grade,
            base_code,
        })
    }

    pub fn name(&self) -> &QuestionName {
        &self.name
    }

    pub fn keys(&self) -> &[MatchingKey] {
        &self.keys
    }

    pub fn possible_grades(&self) -> &[Grade] {
        &self.possible_grades
    }

    pub fn default_grade(&self) -> Grade {
        self.default_grade
    }

    pub fn base_code(&self) -> &str {
        &self.base_code
    }

    pub fn has_base_code(&self) -> bool {
        !self.base_code.is_empty()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades(values: &[f64]) -> Vec<Grade> {
        values.iter().map(|value| Grade::new(*value).unwrap()).collect()
    }

    fn grade(value: f64) -> Grade {
        Grade::new(value).unwrap()
    }

    #[test]
    fn accepts_default_grade_from_allowed_set() {
        let question = Question::new(
            QuestionName::new("Question1".to_owned()),
            vec![MatchingKey::new("q1")],
            grades(&[0.0, 5.0, 10.0]),
            grade(0.0),
            String::new(),
        );
        assert!(question.is_ok());
    }

    #[test]
    fn rejects_default_grade_outside_allowed_set() {
        let question = Question::new(
            QuestionName::new("Question1".to_owned()),
            vec![MatchingKey::new("q1")],
            grades(&[0.0, 5.0, 10.0]),
            grade(7.0),
            String::new(),
        );
        assert!(question.is_err());
    }

    #[test]
    fn rejects_empty_keys() {
        let question = Question::new(
            QuestionName::new("Question1".to_owned()),
            vec![],
            grades(&[0.0]),
            grade(0.0),
            String::new(),
        );
        assert!(question.is_err());
    }

    #[test]
    fn rejects_empty_grade_set() {
        let question = Question::new(
            QuestionName::new("Question1".to_owned()),
            vec![MatchingKey::new("q1")],
            vec![],
            grade(0.0),
            String::new(),
        );
        assert!(question.is_err());
    }

    #[test]
    fn matching_keys_are_lowercased() {
        assert_eq!(MatchingKey::new("Q1_Sorting").as_str(), "q1_sorting");
    }
}
