use log::{debug, info};

use crate::dataset::indexer::{DatasetIndex, Partition};
use crate::dataset::layout::DatasetLayout;
use crate::dataset::split::DatasetSplit;
use crate::error::{Result, ShapeError};
use crate::math::Tensor;
use crate::raster::RasterImage;

/// Decodes every indexed file into its slot.
///
/// The four tensors are allocated up front from the index's validated
/// counts. Files are opened one at a time and closed before the next. The
/// first decode or shape failure aborts the build; the partially filled
/// arrays are dropped.
pub fn build_dataset(index: &DatasetIndex, layout: &DatasetLayout) -> Result<DatasetSplit> {
    let mut split = DatasetSplit {
        train_images: Tensor::zeros(&layout.image_shape(index.train_len))?,
        train_labels: Tensor::zeros(&[index.train_len])?,
        test_images: Tensor::zeros(&layout.image_shape(index.test_len))?,
        test_labels: Tensor::zeros(&[index.test_len])?,
    };

    for file in &index.files {
        let image = RasterImage::open(&file.path)?;
        if image.width != layout.width || image.height != layout.height {
            return Err(ShapeError::ImageSize {
                path: file.path.clone(),
                width: image.width,
                height: image.height,
                expected_width: layout.width,
                expected_height: layout.height,
            }
            .into());
        }

        let assignment = file.assignment;
        let label = u8::try_from(assignment.subject)
            .map_err(|_| ShapeError::TooManySubjects(assignment.subject + 1))?;

        let (images, labels) = match assignment.partition {
            Partition::Train => (&mut split.train_images, &mut split.train_labels),
            Partition::Test => (&mut split.test_images, &mut split.test_labels),
        };
        images.entry_mut(assignment.slot)?.copy_from_slice(image.as_slice());
        labels.entry_mut(assignment.slot)?[0] = label;

        debug!(
            "{} -> {:?}[{}] label {}",
            file.path.display(),
            assignment.partition,
            assignment.slot,
            label
        );
    }

    info!(
        "built dataset: {} train / {} test images of {}x{}",
        split.train_images.len(),
        split.test_images.len(),
        layout.width,
        layout.height
    );
    Ok(split)
}
