use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use itertools::Itertools;

use crate::question::{Question, QuestionName};
use crate::types::{Grade, StudentName, StudentNumber, StudentSurname};

/// One student's submission state for one question. Owned exclusively by its
/// `Student`; the question itself is shared with the catalog.
#[derive(Debug, Clone)]
pub struct StudentQuestionInfo {
    question: Arc<Question>,
    code: String,
    file_path: Option<PathBuf>,
    grade: Grade,
}

impl StudentQuestionInfo {
    pub fn new(
        question: Arc<Question>,
        code: String,
        file_path: Option<PathBuf>,
        grade: Grade,
    ) -> Self {
        Self {
            question,
            code,
            file_path,
            grade,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn shared_question(&self) -> &Arc<Question> {
        &self.question
    }

    /// Empty string means "not submitted".
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn is_submitted(&self) -> bool {
        !self.code.is_empty()
    }

    fn set_grade(&mut self, grade: Grade) {
        self.grade = grade;
    }
}

#[derive(Debug, Clone)]
pub struct Student {
    name: StudentName,
    surname: StudentSurname,
    student_number: StudentNumber,
    submission_directory: PathBuf,
    question_info: Vec<StudentQuestionInfo>,
    is_graded: BTreeMap<QuestionName, bool>,
}

impl Student {
    /// Construction checks the model invariant: one `question_info` entry per
    /// question, no duplicates, and `is_graded` keyed by exactly those names.
    pub fn new(
        name: StudentName,
        surname: StudentSurname,
        student_number: StudentNumber,
        submission_directory: PathBuf,
        question_info: Vec<StudentQuestionInfo>,
        is_graded: BTreeMap<QuestionName, bool>,
    ) -> Result<Self> {
        let duplicates: Vec<_> = question_info
            .iter()
            .map(|info| info.question().name())
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            bail!(
                "student `{name} {surname}` has duplicate question records: {}",
                duplicates.iter().format(", ")
            );
        }

        let info_names: Vec<_> = question_info.iter().map(|info| info.question().name()).collect();
        if is_graded.len() != info_names.len()
            || !info_names.iter().all(|name| is_graded.contains_key(name))
        {
            bail!(
                "graded flags of student `{name} {surname}` do not cover exactly their question records"
            );
        }

        Ok(Self {
            name,
            surname,
            student_number,
            submission_directory,
            question_info,
            is_graded,
        })
    }

    pub fn name(&self) -> &StudentName {
        &self.name
    }

    pub fn surname(&self) -> &StudentSurname {
        &self.surname
    }

    pub fn student_number(&self) -> &StudentNumber {
        &self.student_number
    }

    pub fn submission_directory(&self) -> &Path {
        &self.submission_directory
    }

    pub fn question_info(&self) -> &[StudentQuestionInfo] {
        &self.question_info
    }

    pub fn question_info_for(&self, name: &QuestionName) -> Option<&StudentQuestionInfo> {
        self.question_info.iter().find(|info| info.question().name() == name)
    }

    pub fn is_graded(&self, name: &QuestionName) -> Option<bool> {
        self.is_graded.get(name).copied()
    }

    pub fn is_graded_map(&self) -> &BTreeMap<QuestionName, bool> {
        &self.is_graded
    }

    /// Stores a provisional grade. Membership in the question's allowed set
    /// is deliberately not checked here; graders may hold out-of-range values
    /// mid-pass, and the grading surface owns that validation.
    pub fn set_grade(&mut self, name: &QuestionName, grade: Grade) -> Result<()> {
        let who = self.to_string();
        let info = self
            .question_info
            .iter_mut()
            .find(|info| info.question().name() == name)
            .with_context(|| format!("student `{who}` has no record for question `{name}`"))?;
        info.set_grade(grade);
        Ok(())
    }

    pub fn set_graded(&mut self, name: &QuestionName, graded: bool) -> Result<()> {
        let who = self.to_string();
        let flag = self
            .is_graded
            .get_mut(name)
            .with_context(|| format!("student `{who}` has no graded flag for question `{name}`"))?;
        *flag = graded;
        Ok(())
    }

    /// Roster reconciliation overrides the folder-derived identity fields.
    pub fn set_identity(
        &mut self,
        name: StudentName,
        surname: StudentSurname,
        student_number: StudentNumber,
    ) {
        self.name = name;
        self.surname = surname;
        self.student_number = student_number;
    }
}

// Identity is the stable student number. Name and surname collide for
// same-named students, so they stay out of equality and hashing.
impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.student_number == other.student_number
    }
}

impl Eq for Student {}

impl Hash for Student {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.student_number.hash(state);
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.surname, self.student_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::MatchingKey;

    fn question(name: &str) -> Arc<Question> {
        Arc::new(
            Question::new(
                QuestionName::new(name.to_owned()),
                vec![MatchingKey::new(name)],
                vec![Grade::new(0.0).unwrap(), Grade::new(5.0).unwrap()],
                Grade::new(0.0).unwrap(),
                String::new(),
            )
            .unwrap(),
        )
    }

    fn info(question: &Arc<Question>) -> StudentQuestionInfo {
        StudentQuestionInfo::new(
            Arc::clone(question),
            String::new(),
            None,
            question.default_grade(),
        )
    }

    fn student(number: u64, questions: &[Arc<Question>]) -> Student {
        let is_graded = questions
            .iter()
            .map(|question| (question.name().clone(), false))
            .collect();
        Student::new(
            StudentName::new("Ada".to_owned()),
            StudentSurname::new("Lovelace".to_owned()),
            StudentNumber::new(number),
            PathBuf::from("submissions/Ada Lovelace_1001"),
            questions.iter().map(info).collect(),
            is_graded,
        )
        .unwrap()
    }

    #[test]
    fn rejects_graded_flags_not_matching_question_records() {
        let q1 = question("Question1");
        let result = Student::new(
            StudentName::new("Ada".to_owned()),
            StudentSurname::new("Lovelace".to_owned()),
            StudentNumber::new(1001),
            PathBuf::new(),
            vec![info(&q1)],
            BTreeMap::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_question_records() {
        let q1 = question("Question1");
        let is_graded = [(q1.name().clone(), false)].into_iter().collect();
        let result = Student::new(
            StudentName::new("Ada".to_owned()),
            StudentSurname::new("Lovelace".to_owned()),
            StudentNumber::new(1001),
            PathBuf::new(),
            vec![info(&q1), info(&q1)],
            is_graded,
        );
        assert!(result.is_err());
    }

    #[test]
    fn grade_and_graded_flag_mutations() {
        let q1 = question("Question1");
        let mut student = student(1001, &[Arc::clone(&q1)]);

        student.set_grade(q1.name(), Grade::new(5.0).unwrap()).unwrap();
        student.set_graded(q1.name(), true).unwrap();

        let info = student.question_info_for(q1.name()).unwrap();
        assert_eq!(info.grade().as_f64(), 5.0);
        assert_eq!(student.is_graded(q1.name()), Some(true));

        let unknown = QuestionName::new("Nope".to_owned());
        assert!(student.set_grade(&unknown, Grade::new(5.0).unwrap()).is_err());
        assert!(student.set_graded(&unknown, true).is_err());
    }

    #[test]
    fn identity_is_keyed_on_student_number() {
        let q1 = question("Question1");
        let a = student(1001, &[Arc::clone(&q1)]);
        let mut b = student(1001, &[Arc::clone(&q1)]);
        b.set_identity(
            StudentName::new("Augusta".to_owned()),
            StudentSurname::new("King".to_owned()),
            StudentNumber::new(1001),
        );
        assert_eq!(a, b);

        let c = student(2002, &[q1]);
        assert_ne!(a, c);
    }
}
