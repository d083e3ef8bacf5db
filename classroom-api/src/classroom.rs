//! The classroom model and the builder that ingests it from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{error, info, warn};

use crate::catalog::QuestionCatalog;
use crate::matching::select_submission;
use crate::name_format::{DefaultNameFormatter, NameFormatter, StudentInformation};
use crate::scan::SubmissionScanner;
use crate::student::{Student, StudentQuestionInfo};
use crate::types::StudentNumber;
use crate::unzip::{self, UnzipOutcome};

/// The full roster with per-question submissions and grading state. Built
/// fresh from a directory tree or reloaded from the JSON snapshot; the
/// snapshot is the only durable store.
#[derive(Debug, Clone)]
pub struct Classroom {
    students: Vec<Student>,
}

impl Classroom {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn students_mut(&mut self) -> &mut [Student] {
        &mut self.students
    }

    pub fn student(&self, number: &StudentNumber) -> Option<&Student> {
        self.students.iter().find(|student| student.student_number() == number)
    }

    pub fn student_mut(&mut self, number: &StudentNumber) -> Option<&mut Student> {
        self.students.iter_mut().find(|student| student.student_number() == number)
    }
}

/// Drives directory discovery, name formatting, scanning and matching into a
/// `Classroom`. Every build is a fresh ingestion: grades start at the
/// question defaults and all graded flags at `false`. Resuming grading state
/// goes through the JSON snapshot, never through a rebuild.
pub struct ClassroomBuilder<'a> {
    directory: PathBuf,
    catalog: &'a QuestionCatalog,
    name_formatter: Box<dyn NameFormatter>,
    scanner: SubmissionScanner,
}

impl<'a> ClassroomBuilder<'a> {
    pub fn new(directory: &Path, catalog: &'a QuestionCatalog) -> Self {
        Self {
            directory: directory.to_path_buf(),
            catalog,
            name_formatter: Box::new(DefaultNameFormatter::default()),
            scanner: SubmissionScanner::default(),
        }
    }

    pub fn with_name_formatter(mut self, name_formatter: Box<dyn NameFormatter>) -> Self {
        self.name_formatter = name_formatter;
        self
    }

    pub fn with_scanner(mut self, scanner: SubmissionScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Optional pre-step: expand every archive under the root in place.
    /// Failures are logged and returned per archive, never fatal.
    pub fn unzip(&self) -> Result<Vec<UnzipOutcome>> {
        let outcomes = unzip::unzip_all(&self.directory)?;
        for outcome in &outcomes {
            if let Some(err) = outcome.error() {
                warn!(archive = %outcome.archive().display(), "could not extract archive: {err:#}");
            }
        }
        Ok(outcomes)
    }

    pub fn build(&self) -> Result<Classroom> {
        let student_dirs = self.student_directories()?;

        let mut students = Vec::with_capacity(student_dirs.len());
        for dir in &student_dirs {
            let information = match self.name_formatter.format(dir) {
                Ok(information) => information,
                Err(err) => {
                    error!(directory = %dir.display(), "skipping submission folder: {err:#}");
                    continue;
                }
            };

            let student = self
                .build_student(information)
                .with_context(|| format!("could not build student from `{}`", dir.display()))?;
            students.push(student);
        }

        if students.is_empty() && !student_dirs.is_empty() {
            bail!(
                "none of the {} submission folders under `{}` matched the expected naming convention",
                student_dirs.len(),
                self.directory.display()
            );
        }

        for student in &students {
            for info in student.question_info() {
                if !info.is_submitted() {
                    warn!(student = %student, question = %info.question().name(), "no submission file matched");
                }
            }
        }

        info!(students = students.len(), directory = %self.directory.display(), "built classroom");
        Ok(Classroom::new(students))
    }

    /// Immediate subdirectories of the root, sorted for deterministic builds.
    /// Non-directory entries are ignored.
    fn student_directories(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.directory).with_context(|| {
            format!("could not list submissions directory `{}`", self.directory.display())
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("could not list submissions directory `{}`", self.directory.display())
            })?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn build_student(&self, information: StudentInformation) -> Result<Student> {
        let files = self.scanner.scan(&information.submission_directory)?;

        let mut question_info = Vec::with_capacity(self.catalog.len());
        for question in self.catalog.iter() {
            let selected = select_submission(&files, question.as_ref());
            // Not-found is represented as empty code; an unreadable matched
            // file is a different failure and aborts the build.
            let code = match selected {
                Some(file) => fs::read_to_string(file).with_context(|| {
                    format!("could not read matched submission file `{}`", file.display())
                })?,
                None => String::new(),
            };

            question_info.push(StudentQuestionInfo::new(
                Arc::clone(question),
                code,
                selected.map(Path::to_path_buf),
                question.default_grade(),
            ));
        }

        let is_graded = self.catalog.names().map(|name| (name.clone(), false)).collect();
        Student::new(
            information.name,
            information.surname,
            information.student_number,
            information.submission_directory,
            question_info,
            is_graded,
        )
    }
}
