//! Data prep for the external plagiarism-comparison client.
//!
//! The client itself (network, report artifacts) stays outside this crate;
//! here we only assemble what it consumes: per-student concatenated code for
//! a set of questions, plus the instructor baseline when the questions carry
//! base code.

use std::fmt;

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::debug;

use crate::catalog::QuestionCatalog;
use crate::classroom::Classroom;
use crate::question::QuestionName;
use crate::scan::DEFAULT_SOURCE_EXTENSION;
use crate::types::{StudentName, StudentNumber, StudentSurname};

/// Separator between code blocks when several questions are compared at once.
pub const CODE_SEPARATOR: &str = "\n# --------\n";

#[derive(Debug, Clone)]
pub struct ComparisonSubmission {
    name: StudentName,
    surname: StudentSurname,
    student_number: StudentNumber,
    code: String,
}

impl ComparisonSubmission {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Deterministic artifact name the client uploads the code under.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.{DEFAULT_SOURCE_EXTENSION}",
            self.name, self.surname, self.student_number
        )
    }
}

impl fmt::Display for ComparisonSubmission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.surname, self.student_number)
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonSet {
    submissions: Vec<ComparisonSubmission>,
    base_code: Option<String>,
}

impl ComparisonSet {
    pub fn submissions(&self) -> &[ComparisonSubmission] {
        &self.submissions
    }

    pub fn base_code(&self) -> Option<&str> {
        self.base_code.as_deref()
    }
}

/// Assembles the comparison inputs for `questions`. Students whose code is
/// empty across all requested questions are left out: the client rejects
/// empty uploads, and an unsubmitted question is not evidence of anything.
pub fn comparison_set(
    classroom: &Classroom,
    catalog: &QuestionCatalog,
    questions: &[QuestionName],
) -> Result<ComparisonSet> {
    for name in questions {
        catalog
            .get(name)
            .with_context(|| format!("question `{name}` is not in the catalog"))?;
    }

    let mut submissions = Vec::new();
    for student in classroom.students() {
        let mut parts = Vec::with_capacity(questions.len());
        for name in questions {
            let info = student.question_info_for(name).with_context(|| {
                format!("student `{student}` has no record for question `{name}`")
            })?;
            parts.push(info.code());
        }

        let code = parts.join(CODE_SEPARATOR);
        if code.trim().is_empty() {
            debug!(student = %student, "skipping student with no code for the compared questions");
            continue;
        }

        submissions.push(ComparisonSubmission {
            name: student.name().clone(),
            surname: student.surname().clone(),
            student_number: student.student_number().clone(),
            code,
        });
    }

    let base_codes: Vec<&str> = questions
        .iter()
        .filter_map(|name| catalog.get(name))
        .filter(|question| question.has_base_code())
        .map(|question| question.base_code())
        .collect();
    let base_code = (!base_codes.is_empty()).then(|| base_codes.iter().join(CODE_SEPARATOR));

    Ok(ComparisonSet {
        submissions,
        base_code,
    })
}
