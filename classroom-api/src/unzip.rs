//! Best-effort archive expansion before scanning.
//!
//! Students upload zips at arbitrary depth; every archive is extracted in
//! place into its containing folder. One corrupt archive must never abort the
//! pass, so per-archive results are accumulated and returned to the caller
//! instead of being printed and forgotten.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error, Result, bail};
use tracing::debug;
use walkdir::WalkDir;
use zip::read::ZipArchive;

const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug)]
pub struct UnzipOutcome {
    archive: PathBuf,
    outcome: Result<()>,
}

impl UnzipOutcome {
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }
}

/// Extracts every `.zip` under `root` into its containing directory. The pass
/// itself only fails when the tree cannot be walked at all; extraction
/// failures are captured per archive. Idempotent: re-running overwrites the
/// same extracted paths.
pub fn unzip_all(root: &Path) -> Result<Vec<UnzipOutcome>> {
    let mut archives = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("could not walk `{}` looking for archives", root.display()))?;
        if entry.file_type().is_file() && has_archive_extension(entry.path()) {
            archives.push(entry.into_path());
        }
    }

    let outcomes = archives
        .into_iter()
        .map(|archive| {
            let outcome = extract_into_parent(&archive);
            if outcome.is_ok() {
                debug!(archive = %archive.display(), "extracted archive");
            }
            UnzipOutcome { archive, outcome }
        })
        .collect();

    Ok(outcomes)
}

fn has_archive_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(ARCHIVE_EXTENSION)
}

fn extract_into_parent(archive_path: &Path) -> Result<()> {
    let destination = archive_path
        .parent()
        .with_context(|| format!("archive `{}` has no containing directory", archive_path.display()))?;

    let file = File::open(archive_path)
        .with_context(|| format!("could not open archive `{}`", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("could not read archive `{}`", archive_path.display()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("could not read entry {index} of `{}`", archive_path.display()))?;

        let Some(relative) = entry.enclosed_name() else {
            bail!(
                "entry `{}` of `{}` escapes the extraction directory",
                entry.name(),
                archive_path.display()
            );
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("could not create `{}`", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("could not create `{}`", parent.display()))?;
            }
            let mut out = File::create(&target)
                .with_context(|| format!("could not create `{}`", target.display()))?;
            io::copy(&mut entry, &mut out)
                .with_context(|| format!("could not write `{}`", target.display()))?;
        }
    }

    Ok(())
}
