use core::fmt;

use classroom_api::classroom::Classroom;
use classroom_api::question::QuestionName;

/// A (student, question) pair for which no submission file matched.
#[derive(Debug, Clone)]
pub struct MissingSubmission {
    student: String,
    question: QuestionName,
}

impl MissingSubmission {
    pub fn csv_string(&self) -> String {
        format!("{},{}", self.student, self.question)
    }
}

impl fmt::Display for MissingSubmission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} did not submit a file for {}", self.student, self.question)
    }
}

pub fn missing_submissions(classroom: &Classroom) -> Vec<MissingSubmission> {
    classroom
        .students()
        .iter()
        .flat_map(|student| {
            student
                .question_info()
                .iter()
                .filter(|info| !info.is_submitted())
                .map(|info| MissingSubmission {
                    student: student.to_string(),
                    question: info.question().name().clone(),
                })
        })
        .collect()
}
