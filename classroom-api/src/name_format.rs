//! Folder-name parsing strategies.
//!
//! Submission folders are expected to be named `<name> <surname>_<number>`,
//! possibly with extra `_`-separated trailing segments. Cohorts differ, so
//! the strategy is a trait the builder takes boxed; swapping conventions
//! never touches the builder itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::types::{StudentName, StudentNumber, StudentSurname};

/// Identity fields derived from one submission folder.
#[derive(Debug, Clone)]
pub struct StudentInformation {
    pub name: StudentName,
    pub surname: StudentSurname,
    pub student_number: StudentNumber,
    pub submission_directory: PathBuf,
}

pub trait NameFormatter {
    fn format(&self, submission_dir: &Path) -> Result<StudentInformation>;
}

/// The default convention: last path segment, `<name part>{delimiter}<number part>`,
/// name part split on whitespace into exactly a name and a surname, number
/// part (up to the next delimiter) parsed as the integer student id.
#[derive(Debug, Clone)]
pub struct DefaultNameFormatter {
    delimiter: char,
}

impl DefaultNameFormatter {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for DefaultNameFormatter {
    fn default() -> Self {
        Self::new('_')
    }
}

impl NameFormatter for DefaultNameFormatter {
    fn format(&self, submission_dir: &Path) -> Result<StudentInformation> {
        let dir_name = submission_dir
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| {
                format!("submission folder `{}` has no readable name", submission_dir.display())
            })?;

        let (name_part, number_part) = dir_name.split_once(self.delimiter).with_context(|| {
            format!(
                "submission folder `{dir_name}` has no `{}` separating name and student number",
                self.delimiter
            )
        })?;

        let mut tokens = name_part.split_whitespace();
        let (Some(name), Some(surname), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            bail!(
                "expected exactly `<name> <surname>` before `{}` in submission folder `{dir_name}`",
                self.delimiter
            );
        };

        let number_text = number_part.split(self.delimiter).next().unwrap_or(number_part);
        let student_number: u64 = number_text.parse().with_context(|| {
            format!("student number `{number_text}` of submission folder `{dir_name}` is not an integer")
        })?;

        Ok(StudentInformation {
            name: StudentName::new(name.to_owned()),
            surname: StudentSurname::new(surname.to_owned()),
            student_number: StudentNumber::new(student_number),
            submission_directory: submission_dir.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(path: &str) -> Result<StudentInformation> {
        DefaultNameFormatter::default().format(Path::new(path))
    }

    #[test]
    fn parses_conventional_folder_name() {
        let information = format("submissions/Ada Lovelace_1001").unwrap();
        assert_eq!(information.name.as_str(), "Ada");
        assert_eq!(information.surname.as_str(), "Lovelace");
        assert_eq!(information.student_number.as_str(), "1001");
        assert_eq!(
            information.submission_directory,
            Path::new("submissions/Ada Lovelace_1001")
        );
    }

    #[test]
    fn ignores_trailing_delimited_segments() {
        let information = format("submissions/Ada Lovelace_1001_late").unwrap();
        assert_eq!(information.student_number.as_str(), "1001");
    }

    #[test]
    fn fails_without_delimiter() {
        assert!(format("submissions/Ada Lovelace 1001").is_err());
    }

    #[test]
    fn fails_with_single_name_token() {
        assert!(format("submissions/Ada_1001").is_err());
    }

    #[test]
    fn fails_with_three_name_tokens() {
        assert!(format("submissions/Ada Augusta Lovelace_1001").is_err());
    }

    #[test]
    fn fails_with_non_numeric_student_number() {
        assert!(format("submissions/Ada Lovelace_one").is_err());
    }
}
