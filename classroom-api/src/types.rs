//! Identity and grade value types shared across the classroom model.

use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_with::serde_conv;

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentName {
    name: String,
}

impl StudentName {
    pub fn new(name: String) -> Self {
        Self { name }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentSurname {
    surname: String,
}

impl StudentSurname {
    pub fn new(surname: String) -> Self {
        Self { surname }
    }

    pub fn as_str(&self) -> &str {
        &self.surname
    }
}

impl fmt::Display for StudentSurname {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.surname.fmt(f)
    }
}

/// The stable numeric id assigned by the institution. Held as a string, but
/// always parseable as an integer; the snapshot persists it as one.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StudentNumber {
    number: String,
}

impl StudentNumber {
    pub fn new(number: u64) -> Self {
        Self {
            number: number.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for StudentNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.number.fmt(f)
    }
}

serde_conv! {
    pub(crate) StudentNumberAsInt,
    StudentNumber,
    |student_number: &StudentNumber| student_number.number.parse::<u64>().unwrap(),
    |value: u64| -> Result<_, std::convert::Infallible> {
        Ok(StudentNumber {
            number: value.to_string(),
        })
    }
}

/// A numeric grade value. Construction only rejects non-finite values;
/// membership in a question's allowed set is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade {
    grade: f64,
}

impl Grade {
    pub fn new(grade: f64) -> Result<Self> {
        if !grade.is_finite() {
            bail!("attempted to construct grade with non-finite value `{grade}`");
        }
        Ok(Self { grade })
    }

    pub fn as_f64(self) -> f64 {
        self.grade
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.grade.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_rejects_non_finite_values() {
        assert!(Grade::new(f64::NAN).is_err());
        assert!(Grade::new(f64::INFINITY).is_err());
    }

    #[test]
    fn grade_accepts_zero() {
        assert_eq!(Grade::new(0.0).unwrap().as_f64(), 0.0);
    }
}
