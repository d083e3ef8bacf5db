//! Collecting candidate source files from one student's submission tree.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::trace;
use walkdir::WalkDir;

/// Archive-metadata folders dropped by some unzip tools (`__MACOSX` and
/// friends). Any path segment containing this, case-insensitively, prunes the
/// whole subtree.
pub const ARTIFACT_MARKER: &str = "macos";

pub const DEFAULT_SOURCE_EXTENSION: &str = "py";

/// Recursively collects submission source files. Siblings are visited in
/// file-name order, so repeated scans of the same tree yield the same list —
/// matching ties depend on this.
#[derive(Debug, Clone)]
pub struct SubmissionScanner {
    source_extension: String,
}

impl SubmissionScanner {
    pub fn new(source_extension: &str) -> Self {
        Self {
            source_extension: source_extension.to_owned(),
        }
    }

    pub fn scan(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walk = WalkDir::new(directory)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_platform_artifact(entry.file_name()));

        for entry in walk {
            let entry = entry
                .with_context(|| format!("could not scan submission directory `{}`", directory.display()))?;
            if entry.file_type().is_file() && self.has_source_extension(entry.path()) {
                trace!(file = %entry.path().display(), "collected submission file");
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension().and_then(OsStr::to_str) == Some(self.source_extension.as_str())
    }
}

impl Default for SubmissionScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSION)
    }
}

fn is_platform_artifact(file_name: &OsStr) -> bool {
    file_name
        .to_str()
        .is_some_and(|name| name.to_lowercase().contains(ARTIFACT_MARKER))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "pass\n").unwrap();
    }

    #[test]
    fn collects_only_source_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("q1_solution.py"));
        touch(&dir.path().join("nested/deeper/q2.py"));
        touch(&dir.path().join("notes.txt"));

        let files = SubmissionScanner::default().scan(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|file| file.strip_prefix(dir.path()).unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["nested/deeper/q2.py", "q1_solution.py"]);
    }

    #[test]
    fn prunes_platform_artifact_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("__MACOSX/q1_solution.py"));
        touch(&dir.path().join("real/q1_solution.py"));

        let files = SubmissionScanner::default().scan(dir.path()).unwrap();
        assert_eq!(files, [dir.path().join("real/q1_solution.py")]);
    }

    #[test]
    fn scan_order_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.py"));
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("sub/c.py"));

        let scanner = SubmissionScanner::default();
        let first = scanner.scan(dir.path()).unwrap();
        let second = scanner.scan(dir.path()).unwrap();
        assert_eq!(first, second);
    }
}
