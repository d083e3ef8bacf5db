//! Grade-row hand-off for the spreadsheet collaborator.

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;

use crate::classroom::Classroom;
use crate::question::QuestionName;

/// One spreadsheet row: student identity plus their grading state for a
/// single question.
#[derive(Debug, Clone, Serialize)]
pub struct GradeRow {
    pub name: String,
    pub surname: String,
    pub student_number: String,
    pub grade: f64,
    pub is_graded: bool,
}

/// Rows for one question, in classroom order.
pub fn grade_rows(classroom: &Classroom, question: &QuestionName) -> Result<Vec<GradeRow>> {
    classroom
        .students()
        .iter()
        .map(|student| {
            let info = student.question_info_for(question).with_context(|| {
                format!("student `{student}` has no record for question `{question}`")
            })?;
            let is_graded = student.is_graded(question).with_context(|| {
                format!("student `{student}` has no graded flag for question `{question}`")
            })?;

            Ok(GradeRow {
                name: student.name().as_str().to_owned(),
                surname: student.surname().as_str().to_owned(),
                student_number: student.student_number().as_str().to_owned(),
                grade: info.grade().as_f64(),
                is_graded,
            })
        })
        .try_collect()
}
