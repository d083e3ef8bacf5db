//! JSON persistence for the classroom model.
//!
//! The snapshot is a plain array of student records and doubles as the
//! hand-off format for the export collaborators. Saving overwrites the whole
//! file. Loading pairs each persisted record with the *live* catalog by
//! question name: grading scales and keys may evolve between runs, so the
//! persisted question payload is never trusted verbatim — only `code`,
//! `grade`, `file_path` and the graded flags survive from the snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use tracing::{debug, warn};

use crate::catalog::QuestionCatalog;
use crate::classroom::Classroom;
use crate::question::{MatchingKey, QuestionName};
use crate::student::{Student, StudentQuestionInfo};
use crate::types::{Grade, StudentName, StudentNumber, StudentNumberAsInt, StudentSurname};

pub fn save_classroom(classroom: &Classroom, path: &Path) -> Result<()> {
    let records: Vec<StudentRecord> =
        classroom.students().iter().map(StudentRecord::from_student).collect();
    let json = serde_json::to_string_pretty(&records).context("could not serialize classroom")?;
    fs::write(path, json)
        .with_context(|| format!("could not write classroom snapshot `{}`", path.display()))?;
    debug!(students = records.len(), snapshot = %path.display(), "saved classroom");
    Ok(())
}

pub fn load_classroom(path: &Path, catalog: &QuestionCatalog) -> Result<Classroom> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read classroom snapshot `{}`", path.display()))?;
    let records: Vec<StudentRecord> = serde_json::from_str(&json)
        .with_context(|| format!("could not decode classroom snapshot `{}`", path.display()))?;

    let students = records
        .into_iter()
        .map(|record| record.into_student(catalog))
        .try_collect()?;
    Ok(Classroom::new(students))
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StudentRecord {
    name: StudentName,
    surname: StudentSurname,
    #[serde_as(as = "StudentNumberAsInt")]
    student_number: StudentNumber,
    submission_directory: PathBuf,
    question_info: Vec<QuestionInfoRecord>,
    is_graded: BTreeMap<QuestionName, bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionInfoRecord {
    question: QuestionRecord,
    code: String,
    file_path: Option<PathBuf>,
    grade: Grade,
}

/// Persisted question metadata. Written for the benefit of external readers
/// of the snapshot; on load it is replaced by the live catalog entry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionRecord {
    question: QuestionName,
    keys: Vec<String>,
    grade: Grade,
    possible_grades: Vec<Grade>,
    base_code: String,
}

impl StudentRecord {
    fn from_student(student: &Student) -> Self {
        Self {
            name: student.name().clone(),
            surname: student.surname().clone(),
            student_number: student.student_number().clone(),
            submission_directory: student.submission_directory().to_path_buf(),
            question_info: student
                .question_info()
                .iter()
                .map(QuestionInfoRecord::from_info)
                .collect(),
            is_graded: student.is_graded_map().clone(),
        }
    }

    fn into_student(self, catalog: &QuestionCatalog) -> Result<Student> {
        let student_label = format!("{} {}", self.name, self.surname);
        for orphan in self
            .question_info
            .iter()
            .filter(|info| catalog.get(&info.question.question).is_none())
        {
            warn!(
                student = %student_label,
                question = %orphan.question.question,
                "dropping persisted record for a question no longer in the catalog"
            );
        }

        let mut question_info = Vec::with_capacity(catalog.len());
        for question in catalog.iter() {
            let record = self
                .question_info
                .iter()
                .find(|info| &info.question.question == question.name())
                .with_context(|| {
                    format!(
                        "snapshot of student `{} {}` has no record for question `{}`; \
                         rebuild the classroom before grading new questions",
                        self.name,
                        self.surname,
                        question.name()
                    )
                })?;

            question_info.push(StudentQuestionInfo::new(
                Arc::clone(question),
                record.code.clone(),
                record.file_path.clone(),
                record.grade,
            ));
        }

        let is_graded = catalog
            .names()
            .map(|name| {
                let graded = self.is_graded.get(name).copied().with_context(|| {
                    format!(
                        "snapshot of student `{} {}` has no graded flag for question `{}`",
                        self.name, self.surname, name
                    )
                })?;
                Ok((name.clone(), graded))
            })
            .try_collect::<_, BTreeMap<_, _>, anyhow::Error>()?;

        Student::new(
            self.name,
            self.surname,
            self.student_number,
            self.submission_directory,
            question_info,
            is_graded,
        )
    }
}

impl QuestionInfoRecord {
    fn from_info(info: &StudentQuestionInfo) -> Self {
        let question = info.question();
        Self {
            question: QuestionRecord {
                question: question.name().clone(),
                keys: question.keys().iter().map(MatchingKey::as_str).map(str::to_owned).collect(),
                grade: question.default_grade(),
                possible_grades: question.possible_grades().to_vec(),
                base_code: question.base_code().to_owned(),
            },
            code: info.code().to_owned(),
            file_path: info.file_path().map(Path::to_path_buf),
            grade: info.grade(),
        }
    }
}
