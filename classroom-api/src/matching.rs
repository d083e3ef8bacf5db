//! Binding scanned files to questions by keyword containment.

use std::path::{Path, PathBuf};

use crate::question::Question;

/// Selects the submission file for `question` out of the scanned file list:
/// the first file (scan order) whose lowercased path contains any of the
/// question's keys. Questions are matched independently, so one file may be
/// selected for several questions.
pub fn select_submission<'a>(files: &'a [PathBuf], question: &Question) -> Option<&'a Path> {
    files
        .iter()
        .map(PathBuf::as_path)
        .find(|file| matches_question(file, question))
}

fn matches_question(file: &Path, question: &Question) -> bool {
    let lowered = file.to_string_lossy().to_lowercase();
    question.keys().iter().any(|key| lowered.contains(key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{MatchingKey, QuestionName};
    use crate::types::Grade;

    fn question(keys: &[&str]) -> Question {
        Question::new(
            QuestionName::new("Question1".to_owned()),
            keys.iter().map(|key| MatchingKey::new(key)).collect(),
            vec![Grade::new(0.0).unwrap()],
            Grade::new(0.0).unwrap(),
            String::new(),
        )
        .unwrap()
    }

    fn files(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn first_match_in_scan_order_wins() {
        let files = files(&["sub/q1_draft.py", "sub/q1_final.py"]);
        let selected = select_submission(&files, &question(&["q1"]));
        assert_eq!(selected, Some(Path::new("sub/q1_draft.py")));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let files = files(&["sub/Q1_Solution.py"]);
        let selected = select_submission(&files, &question(&["q1"]));
        assert_eq!(selected, Some(Path::new("sub/Q1_Solution.py")));
    }

    #[test]
    fn key_may_match_a_directory_segment() {
        let files = files(&["sub/q1/solution.py"]);
        let selected = select_submission(&files, &question(&["q1"]));
        assert_eq!(selected, Some(Path::new("sub/q1/solution.py")));
    }

    #[test]
    fn any_key_suffices() {
        let files = files(&["sub/sorting.py"]);
        let selected = select_submission(&files, &question(&["q1", "sort"]));
        assert_eq!(selected, Some(Path::new("sub/sorting.py")));
    }

    #[test]
    fn no_match_yields_none() {
        let files = files(&["sub/other.py"]);
        assert_eq!(select_submission(&files, &question(&["q1"])), None);
    }
}
