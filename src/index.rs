//! # Sample Lists
//!
//! Per-step sample lists name the images (by base-name) used at each
//! step of a class-incremental task.
use crate::config::{Setting, Split};
use crate::error::{DecodeError, VocError};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Source of the ordered sample base-names for a task step and split.
pub trait FileIndex: Debug + Send + Sync {
    /// Sample base-names for `split` of `step` of `task`.
    fn sample_names(
        &self,
        task: &str,
        step: usize,
        split: Split,
        setting: Setting,
    ) -> Result<Vec<String>, VocError>;
}

/// Reads a newline separated list of sample base-names.
///
/// Surrounding whitespace is trimmed; blank lines are skipped.
pub fn read_name_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, VocError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let names: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    tracing::debug!(path = %path.display(), count = names.len(), "read sample list");

    Ok(names)
}

/// A [`FileIndex`] over list files laid out as
/// `<root>/<task>/<setting>/<split>_cls<step>.txt`.
#[derive(Debug, Clone)]
pub struct SplitListIndex {
    root: PathBuf,
}

impl SplitListIndex {
    /// Creates an index rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The list file for a task step and split.
    pub fn list_path(
        &self,
        task: &str,
        step: usize,
        split: Split,
        setting: Setting,
    ) -> PathBuf {
        self.root
            .join(task)
            .join(setting.as_str())
            .join(format!("{}_cls{step}.txt", split.as_str()))
    }
}

impl FileIndex for SplitListIndex {
    fn sample_names(
        &self,
        task: &str,
        step: usize,
        split: Split,
        setting: Setting,
    ) -> Result<Vec<String>, VocError> {
        read_name_list(self.list_path(task, step, split, setting))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_name_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("names.txt");
        std::fs::write(&path, "2007_000032\n\n  2007_000039 \r\n2007_000063\n").unwrap();

        assert_eq!(
            read_name_list(&path).unwrap(),
            vec!["2007_000032", "2007_000039", "2007_000063"]
        );
    }

    #[test]
    fn test_missing_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = read_name_list(temp_dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, VocError::Decode(DecodeError::Io { .. })));
    }

    #[test]
    fn test_split_list_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        let index = SplitListIndex::new(temp_dir.path());

        let path = index.list_path("15-1", 2, Split::Train, Setting::Overlap);
        assert_eq!(
            path,
            temp_dir.path().join("15-1/overlap/train_cls2.txt")
        );

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "a\nb\n").unwrap();

        assert_eq!(
            index
                .sample_names("15-1", 2, Split::Train, Setting::Overlap)
                .unwrap(),
            vec!["a", "b"]
        );
        assert!(
            index
                .sample_names("15-1", 2, Split::Val, Setting::Overlap)
                .is_err()
        );
    }
}
