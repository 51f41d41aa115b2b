use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::dataset::split::DatasetSplit;
use crate::error::{Error, Result};
use crate::math::Tensor;
use crate::persist::{load_json, save_json};

pub const TRAIN_FEATURES: &str = "train_features.json";
pub const TRAIN_LABELS: &str = "train_labels.json";
pub const TEST_FEATURES: &str = "test_features.json";
pub const TEST_LABELS: &str = "test_labels.json";

/// Paths of the four artifacts inside `dir`, in the order
/// train features, train labels, test features, test labels.
pub fn artifact_paths(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join(TRAIN_FEATURES),
        dir.join(TRAIN_LABELS),
        dir.join(TEST_FEATURES),
        dir.join(TEST_LABELS),
    ]
}

/// Writes the four arrays into `dir`, creating it if needed.
///
/// Returns the written paths. If this fails midway the directory holds a
/// mix of old and new artifacts and must be rebuilt.
pub fn save_split(dir: &Path, split: &DatasetSplit) -> Result<[PathBuf; 4]> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let paths = artifact_paths(dir);
    let tensors = [
        &split.train_images,
        &split.train_labels,
        &split.test_images,
        &split.test_labels,
    ];
    for (path, tensor) in paths.iter().zip(tensors) {
        save_json(path, tensor)?;
    }

    info!("saved dataset to {}", dir.display());
    Ok(paths)
}

/// Reads the four arrays back from `dir` and checks they are consistent.
pub fn load_split(dir: &Path) -> Result<DatasetSplit> {
    let [train_features, train_labels, test_features, test_labels] = artifact_paths(dir);

    let split = DatasetSplit {
        train_images: load_json::<Tensor<u8>>(&train_features)?,
        train_labels: load_json::<Tensor<u8>>(&train_labels)?,
        test_images: load_json::<Tensor<u8>>(&test_features)?,
        test_labels: load_json::<Tensor<u8>>(&test_labels)?,
    };
    split.validate()?;

    info!(
        "loaded dataset from {}: {} train / {} test",
        dir.display(),
        split.train_images.len(),
        split.test_images.len()
    );
    Ok(split)
}
