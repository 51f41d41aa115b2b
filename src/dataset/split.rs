use crate::error::ShapeError;
use crate::math::Tensor;

/// The four arrays produced by a build: images are `[n, 1, height, width]`,
/// labels are `[n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSplit {
    pub train_images: Tensor<u8>,
    pub train_labels: Tensor<u8>,
    pub test_images: Tensor<u8>,
    pub test_labels: Tensor<u8>,
}

impl DatasetSplit {
    /// Checks every tensor's length against its shape and that the four
    /// arrays agree with each other.
    pub fn validate(&self) -> Result<(), ShapeError> {
        for tensor in [&self.train_images, &self.train_labels, &self.test_images, &self.test_labels] {
            tensor.validate()?;
        }

        for (name, images) in [("train", &self.train_images), ("test", &self.test_images)] {
            if images.shape.len() != 4 || images.shape[1] != 1 {
                return Err(ShapeError::Inconsistent(format!(
                    "{} images must be [n, 1, height, width], got {:?}",
                    name, images.shape
                )));
            }
        }
        for (name, labels) in [("train", &self.train_labels), ("test", &self.test_labels)] {
            if labels.shape.len() != 1 {
                return Err(ShapeError::Inconsistent(format!(
                    "{} labels must be one-dimensional, got {:?}",
                    name, labels.shape
                )));
            }
        }

        if self.train_images.len() != self.train_labels.len() {
            return Err(ShapeError::Inconsistent(format!(
                "{} train images but {} train labels",
                self.train_images.len(),
                self.train_labels.len()
            )));
        }
        if self.test_images.len() != self.test_labels.len() {
            return Err(ShapeError::Inconsistent(format!(
                "{} test images but {} test labels",
                self.test_images.len(),
                self.test_labels.len()
            )));
        }
        if self.train_images.shape[1..] != self.test_images.shape[1..] {
            return Err(ShapeError::Inconsistent(format!(
                "train images are {:?} but test images are {:?}",
                &self.train_images.shape[1..],
                &self.test_images.shape[1..]
            )));
        }
        Ok(())
    }

    /// `(height, width)` of every image.
    pub fn image_dims(&self) -> (usize, usize) {
        match self.train_images.shape.as_slice() {
            [_, _, h, w] => (*h, *w),
            _ => (0, 0),
        }
    }
}
