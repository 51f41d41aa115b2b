use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Shape of an on-disk face dataset: how many files each subject folder
/// holds, how they split, and the size every raster must have.
///
/// The defaults describe the 40-subject, 10-pose, 92x112 face database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    /// File extension (without the dot) that marks a raster file.
    pub extension: String,
    /// Files each subject folder contributes.
    pub per_subject: usize,
    /// Leading files of each subject that go to the train partition.
    pub train_per_subject: usize,
    pub width: usize,
    pub height: usize,
    /// Exact number of subjects the tree must yield; `None` accepts any count.
    pub subjects: Option<usize>,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        DatasetLayout {
            extension: "pgm".to_owned(),
            per_subject: 10,
            train_per_subject: 7,
            width: 92,
            height: 112,
            subjects: None,
        }
    }
}

impl DatasetLayout {
    pub fn test_per_subject(&self) -> usize {
        self.per_subject - self.train_per_subject
    }

    /// Samples per image: one channel of `height x width`.
    pub fn image_size(&self) -> usize {
        self.width * self.height
    }

    /// Shape of the image tensor holding `count` images.
    pub fn image_shape(&self, count: usize) -> [usize; 4] {
        [count, 1, self.height, self.width]
    }

    /// Rejects layouts the slot formulas cannot serve.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.per_subject == 0 {
            return Err(ShapeError::Layout("per_subject must be at least 1".to_owned()));
        }
        if self.train_per_subject > self.per_subject {
            return Err(ShapeError::Layout(format!(
                "train_per_subject ({}) exceeds per_subject ({})",
                self.train_per_subject, self.per_subject
            )));
        }
        if self.extension.is_empty() {
            return Err(ShapeError::Layout("extension must not be empty".to_owned()));
        }
        Ok(())
    }
}
