// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input discovery: list the photos in a directory and pair each with its
// output path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use trapcrop_core::config::ExtensionMatcher;
use trapcrop_core::error::{Result, TrapcropError};
use trapcrop_core::types::Task;

/// Files found in an input directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Matching files, sorted by file name.
    pub eligible: Vec<PathBuf>,
    /// Entries rejected by the extension filter (including subdirectories).
    pub skipped: usize,
}

/// List the files directly inside `input_dir` accepted by `matcher`.
///
/// Subdirectories are not descended into.
#[instrument(skip_all, fields(dir = %input_dir.display()))]
pub fn discover(input_dir: &Path, matcher: &ExtensionMatcher) -> Result<Discovery> {
    if !input_dir.is_dir() {
        return Err(TrapcropError::DirectoryMissing(input_dir.to_path_buf()));
    }

    let mut found = Discovery::default();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && matcher.matches(&path) {
            found.eligible.push(path);
        } else {
            debug!(path = %path.display(), "Ignoring entry");
            found.skipped += 1;
        }
    }

    found
        .eligible
        .sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(
        eligible = found.eligible.len(),
        skipped = found.skipped,
        "Directory scanned"
    );
    Ok(found)
}

/// One task per input, writing to the same file name under `output_dir`.
pub fn plan_tasks(inputs: Vec<PathBuf>, output_dir: &Path) -> Vec<Task> {
    inputs
        .into_iter()
        .filter_map(|input| Task::mirrored(input, output_dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "c.jpg", "notes.txt", "raw.tif"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let found = discover(dir.path(), &ExtensionMatcher::default()).unwrap();
        let names: Vec<_> = found
            .eligible
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.JPG", "b.png", "c.jpg"]);
        assert_eq!(found.skipped, 3);
    }

    #[test]
    fn discover_case_sensitive_glob() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["upper.JPG", "lower.jpg", "pic.png"] {
            touch(dir.path(), name);
        }

        let matcher = ExtensionMatcher::CaseSensitive(vec!["JPG".into()]);
        let found = discover(dir.path(), &matcher).unwrap();
        assert_eq!(found.eligible, [dir.path().join("upper.JPG")]);
        assert_eq!(found.skipped, 2);
    }

    #[test]
    fn discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        let err = discover(&missing, &ExtensionMatcher::default()).unwrap_err();
        assert!(matches!(err, TrapcropError::DirectoryMissing(p) if p == missing));
    }

    #[test]
    fn plan_tasks_mirrors_names() {
        let tasks = plan_tasks(
            vec![PathBuf::from("/in/one.jpg"), PathBuf::from("/in/two.png")],
            Path::new("/out"),
        );
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].output, PathBuf::from("/out/one.jpg"));
        assert_eq!(tasks[1].output, PathBuf::from("/out/two.png"));
    }
}
