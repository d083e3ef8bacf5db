//! Roster reconciliation.
//!
//! Folder names are typed by students and are noisy; the registrar's CSV
//! roster (`STD NO`, `NAME`, `SURNAME`) is authoritative. When a roster is
//! supplied, every student's identity fields are overwritten from their
//! roster row.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classroom::Classroom;
use crate::student::Student;
use crate::types::{StudentName, StudentNumber, StudentSurname};

#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    #[serde(rename = "STD NO")]
    student_number: u64,
    #[serde(rename = "NAME")]
    name: String,
    #[serde(rename = "SURNAME")]
    surname: String,
}

impl RosterEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn student_number(&self) -> u64 {
        self.student_number
    }

    /// `name` and `surname` are the lowercased folder-derived fields. A row
    /// matches when any token of the roster name occurs in the folder name
    /// and the roster surname in the folder surname; failing that, a
    /// two-token roster name may have spilled its second token into the
    /// folder surname.
    fn matches(&self, name: &str, surname: &str) -> bool {
        let roster_surname = self.surname.to_lowercase();
        let tokens: Vec<String> =
            self.name.to_lowercase().split_whitespace().map(str::to_owned).collect();

        if tokens.iter().any(|token| name.contains(token.as_str()))
            && surname.contains(roster_surname.as_str())
        {
            return true;
        }

        matches!(
            tokens.as_slice(),
            [first, second, ..] if name.contains(first.as_str()) && surname.contains(second.as_str())
        )
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("could not open roster `{}`", path.display()))?;
        Self::from_csv_reader(&mut reader)
            .with_context(|| format!("could not parse roster `{}`", path.display()))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Self::from_csv_reader(&mut csv::Reader::from_reader(reader))
    }

    fn from_csv_reader(reader: &mut csv::Reader<impl Read>) -> Result<Self> {
        let entries = reader
            .deserialize()
            .collect::<Result<Vec<RosterEntry>, _>>()
            .context("could not decode roster rows")?;
        Ok(Self { entries })
    }

    pub fn find(&self, student: &Student) -> Result<&RosterEntry> {
        let name = student.name().as_str().to_lowercase();
        let surname = student.surname().as_str().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.matches(&name, &surname))
            .with_context(|| format!("student `{student}` has no roster row"))
    }

    /// Overwrites every student's identity fields from their roster row.
    /// A student with no row is fatal; the caller decides whether to rebuild
    /// or fix the roster.
    pub fn apply(&self, classroom: &mut Classroom) -> Result<()> {
        for student in classroom.students_mut() {
            let entry = self.find(student)?;
            student.set_identity(
                StudentName::new(entry.name.clone()),
                StudentSurname::new(entry.surname.clone()),
                StudentNumber::new(entry.student_number),
            );
        }
        Ok(())
    }
}
