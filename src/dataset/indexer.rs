use std::cmp::Ordering;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::dataset::layout::DatasetLayout;
use crate::error::{Error, Result, ShapeError};

/// Which half of the split a file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Train,
    Test,
}

/// Where one discovered file is written in the output arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub partition: Partition,
    /// Index within the partition's arrays.
    pub slot: usize,
    /// Subject (class) number; becomes the label.
    pub subject: usize,
}

#[derive(Debug, Clone)]
pub struct IndexedFile {
    pub path: PathBuf,
    /// Position in discovery order, starting at 0.
    pub position: usize,
    pub assignment: Assignment,
}

/// Every raster under a root, in discovery order, with its slot assignment.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    pub files: Vec<IndexedFile>,
    pub subjects: usize,
    pub train_len: usize,
    pub test_len: usize,
}

/// Orders names by character count, then lexicographically.
///
/// Subject folders and pose files are named with bare integers, so plain
/// string order would put `"10"` before `"2"`.
pub fn by_length_then_name(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Maps a discovery position to its (partition, slot, subject).
///
/// With 10 files per subject and 7 for training, position `i` belongs to
/// subject `i / 10`; local index `i % 10 < 7` fills train slot
/// `local + subject * 7`, the rest fill test slot `(local - 7) + subject * 3`.
pub fn assign(position: usize, layout: &DatasetLayout) -> Assignment {
    let subject = position / layout.per_subject;
    let local = position % layout.per_subject;

    if local < layout.train_per_subject {
        Assignment {
            partition: Partition::Train,
            slot: local + subject * layout.train_per_subject,
            subject,
        }
    } else {
        Assignment {
            partition: Partition::Test,
            slot: (local - layout.train_per_subject) + subject * layout.test_per_subject(),
            subject,
        }
    }
}

/// Walks `root` top-down and returns every file ending in `.{extension}`.
///
/// At each directory its own files come first, then its subdirectories are
/// descended one at a time; both lists are sorted with
/// [`by_length_then_name`]. Symlinked directories are not followed.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension);
    let mut found = Vec::new();
    walk(root, &suffix, &mut found)?;
    Ok(found)
}

/// Discovers the rasters under `root` and assigns each a slot.
///
/// The total count is checked against the layout before any slot is
/// computed, so a malformed tree fails here instead of aliasing slots later.
pub fn index_dataset(root: &Path, layout: &DatasetLayout) -> Result<DatasetIndex> {
    layout.validate()?;

    let paths = discover(root, &layout.extension)?;
    let subjects = check_count(paths.len(), layout)?;

    let files: Vec<IndexedFile> = paths
        .into_iter()
        .enumerate()
        .map(|(position, path)| {
            let assignment = assign(position, layout);
            debug!("{} -> {:?}", path.display(), assignment);
            IndexedFile { path, position, assignment }
        })
        .collect();

    let index = DatasetIndex {
        files,
        subjects,
        train_len: subjects * layout.train_per_subject,
        test_len: subjects * layout.test_per_subject(),
    };
    info!(
        "indexed {} rasters under {}: {} subjects, {} train / {} test",
        index.files.len(),
        root.display(),
        index.subjects,
        index.train_len,
        index.test_len
    );
    Ok(index)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_count(found: usize, layout: &DatasetLayout) -> std::result::Result<usize, ShapeError> {
    if found == 0 {
        return Err(ShapeError::Empty { extension: layout.extension.clone() });
    }
    if found % layout.per_subject != 0 {
        return Err(ShapeError::NotMultiple { found, per_subject: layout.per_subject });
    }

    let subjects = found / layout.per_subject;
    if let Some(expected) = layout.subjects {
        if subjects != expected {
            return Err(ShapeError::SubjectCount { found: subjects, expected });
        }
    }
    // Labels are stored as u8.
    if subjects > usize::from(u8::MAX) + 1 {
        return Err(ShapeError::TooManySubjects(subjects));
    }
    Ok(subjects)
}

fn walk(dir: &Path, suffix: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut files: Vec<(String, OsString)> = Vec::new();
    let mut dirs: Vec<(String, OsString)> = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        let raw = entry.file_name();
        let name = raw.to_string_lossy().into_owned();
        if file_type.is_dir() {
            dirs.push((name, raw));
        } else {
            files.push((name, raw));
        }
    }

    files.sort_by(|a, b| by_length_then_name(&a.0, &b.0));
    dirs.sort_by(|a, b| by_length_then_name(&a.0, &b.0));

    found.extend(
        files
            .into_iter()
            .filter(|(name, _)| name.ends_with(suffix))
            .map(|(_, raw)| dir.join(raw)),
    );

    for (_, raw) in dirs {
        walk(&dir.join(raw), suffix, found)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_names_sort_numerically() {
        let mut names: Vec<String> = (1..=10).rev().map(|i| i.to_string()).collect();
        names.sort_by(|a, b| by_length_then_name(a, b));
        let expected: Vec<String> = (1..=10).map(|i| i.to_string()).collect();
        assert_eq!(names, expected);

        let mut files = vec!["10.pgm", "2.pgm", "1.pgm", "9.pgm"];
        files.sort_by(|a, b| by_length_then_name(a, b));
        assert_eq!(files, vec!["1.pgm", "2.pgm", "9.pgm", "10.pgm"]);
    }

    #[test]
    fn equal_length_names_fall_back_to_lexicographic() {
        let mut names = vec!["s9", "s10", "s1", "sa"];
        names.sort_by(|a, b| by_length_then_name(a, b));
        assert_eq!(names, vec!["s1", "s9", "sa", "s10"]);
    }

    #[test]
    fn assignment_packs_subjects_contiguously() {
        let layout = DatasetLayout::default();

        let first = assign(0, &layout);
        assert_eq!(first, Assignment { partition: Partition::Train, slot: 0, subject: 0 });

        let seventh = assign(6, &layout);
        assert_eq!(seventh, Assignment { partition: Partition::Train, slot: 6, subject: 0 });

        let eighth = assign(7, &layout);
        assert_eq!(eighth, Assignment { partition: Partition::Test, slot: 0, subject: 0 });

        let subject_three = assign(3 * 10 + 8, &layout);
        assert_eq!(subject_three, Assignment { partition: Partition::Test, slot: 10, subject: 3 });

        let last = assign(399, &layout);
        assert_eq!(last, Assignment { partition: Partition::Test, slot: 119, subject: 39 });
    }

    #[test]
    fn count_checks() {
        let layout = DatasetLayout::default();
        assert!(matches!(check_count(0, &layout), Err(ShapeError::Empty { .. })));
        assert!(matches!(
            check_count(395, &layout),
            Err(ShapeError::NotMultiple { found: 395, per_subject: 10 })
        ));
        assert_eq!(check_count(400, &layout).unwrap(), 40);

        let strict = DatasetLayout { subjects: Some(40), ..DatasetLayout::default() };
        assert!(matches!(
            check_count(10, &strict),
            Err(ShapeError::SubjectCount { found: 1, expected: 40 })
        ));
        assert!(matches!(check_count(2570, &layout), Err(ShapeError::TooManySubjects(257))));
    }
}
