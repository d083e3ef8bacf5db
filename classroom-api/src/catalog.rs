//! The question catalog: the ordered, immutable list of graded questions.
//!
//! Loaded once from a TOML file and passed by reference into the builder and
//! the persistence loader. There is deliberately no process-wide catalog; any
//! code that needs the questions takes an explicit `&QuestionCatalog`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use crate::question::{MatchingKey, Question, QuestionName};
use crate::types::Grade;

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Arc<Question>>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Arc<Question>>) -> Result<Self> {
        let duplicates: Vec<_> = questions
            .iter()
            .map(|question| question.name())
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            bail!("catalog contains duplicate question names: {}", duplicates.iter().format(", "));
        }

        Ok(Self { questions })
    }

    /// Loads the catalog from a TOML file. Any invalid entry is fatal: no
    /// build may proceed against a half-checked catalog.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read catalog file `{}`", path.display()))?;
        let file: CatalogFile = toml::from_str(&text)
            .with_context(|| format!("could not parse catalog file `{}`", path.display()))?;

        // Base-code paths are resolved relative to the catalog file.
        let base_dir = path.parent().unwrap_or(Path::new("."));
        let questions = file
            .questions
            .into_iter()
            .map(|entry| entry.into_question(base_dir).map(Arc::new))
            .try_collect()?;

        let catalog = Self::new(questions)?;
        debug!(questions = catalog.len(), catalog = %path.display(), "loaded question catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Question>> {
        self.questions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &QuestionName> {
        self.questions.iter().map(|question| question.name())
    }

    pub fn get(&self, name: &QuestionName) -> Option<&Arc<Question>> {
        self.questions.iter().find(|question| question.name() == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    questions: Vec<QuestionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionEntry {
    question: String,
    keys: Vec<String>,
    possible_grades: Vec<f64>,
    grade: f64,
    base_code_file: Option<PathBuf>,
}

impl QuestionEntry {
    fn into_question(self, base_dir: &Path) -> Result<Question> {
        let base_code = match &self.base_code_file {
            Some(file) => {
                let path = base_dir.join(file);
                fs::read_to_string(&path).with_context(|| {
                    format!(
                        "could not read base code file `{}` of question `{}`",
                        path.display(),
                        self.question
                    )
                })?
            }
            None => String::new(),
        };

        let possible_grades: Vec<Grade> =
            self.possible_grades.iter().map(|grade| Grade::new(*grade)).try_collect()?;
        let keys = self.keys.iter().map(|key| MatchingKey::new(key)).collect();

        Question::new(
            QuestionName::new(self.question),
            keys,
            possible_grades,
            Grade::new(self.grade)?,
            base_code,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_catalog(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("settings.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_questions_in_order_with_base_code() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base_q2.py"), "def reference(): pass\n").unwrap();
        let path = write_catalog(
            dir.path(),
            r#"
            [[questions]]
            question = "Question1"
            keys = ["q1", "sort"]
            possible_grades = [0.0, 5.0, 10.0]
            grade = 0.0

            [[questions]]
            question = "Question2"
            keys = ["q2"]
            possible_grades = [0.0, 10.0]
            grade = 0.0
            base_code_file = "base_q2.py"
            "#,
        );

        let catalog = QuestionCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        let names: Vec<_> = catalog.names().map(QuestionName::as_str).collect();
        assert_eq!(names, ["Question1", "Question2"]);
        let question2 = catalog.get(&QuestionName::new("Question2".to_owned())).unwrap();
        assert!(question2.has_base_code());
        assert_eq!(question2.base_code(), "def reference(): pass\n");
    }

    #[test]
    fn rejects_default_grade_outside_allowed_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            r#"
            [[questions]]
            question = "Question1"
            keys = ["q1"]
            possible_grades = [0.0, 5.0]
            grade = 7.0
            "#,
        );
        assert!(QuestionCatalog::from_path(&path).is_err());
    }

    #[test]
    fn rejects_duplicate_question_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            r#"
            [[questions]]
            question = "Question1"
            keys = ["q1"]
            possible_grades = [0.0]
            grade = 0.0

            [[questions]]
            question = "Question1"
            keys = ["one"]
            possible_grades = [0.0]
            grade = 0.0
            "#,
        );
        assert!(QuestionCatalog::from_path(&path).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            r#"
            [[questions]]
            question = "Question1"
            keys = ["q1"]
            possible_grades = [0.0]
            grade = 0.0
            weight = 2.0
            "#,
        );
        assert!(QuestionCatalog::from_path(&path).is_err());
    }

    #[test]
    fn rejects_missing_base_code_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            r#"
            [[questions]]
            question = "Question1"
            keys = ["q1"]
            possible_grades = [0.0]
            grade = 0.0
            base_code_file = "does_not_exist.py"
            "#,
        );
        assert!(QuestionCatalog::from_path(&path).is_err());
    }
}
