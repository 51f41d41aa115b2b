use crate::error::ShapeError;
use crate::math::{Matrix, Tensor};

/// Flattened images (one per row, raw sample values as `f64`) paired with
/// their class indices.
#[derive(Debug, Clone)]
pub struct Samples {
    pub inputs: Matrix,
    pub targets: Vec<usize>,
}

impl Samples {
    /// Converts an image tensor and its label tensor. Samples are not
    /// rescaled.
    pub fn from_tensors(images: &Tensor<u8>, labels: &Tensor<u8>) -> Result<Samples, ShapeError> {
        images.validate()?;
        labels.validate()?;
        if images.len() != labels.len() {
            return Err(ShapeError::Inconsistent(format!(
                "{} images but {} labels",
                images.len(),
                labels.len()
            )));
        }

        let inputs = Matrix::from_vec(
            images.len(),
            images.entry_size(),
            images.data.iter().map(|&v| f64::from(v)).collect(),
        );
        let targets = labels.data.iter().map(|&l| usize::from(l)).collect();
        Ok(Samples { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of classes implied by the largest target.
    pub fn classes(&self) -> usize {
        self.targets.iter().max().map_or(0, |&m| m + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_each_image_to_a_row() {
        let images = Tensor { shape: vec![2, 1, 1, 3], data: vec![1, 2, 3, 250, 251, 252] };
        let labels = Tensor { shape: vec![2], data: vec![4, 0] };
        let samples = Samples::from_tensors(&images, &labels).unwrap();

        assert_eq!((samples.inputs.rows, samples.inputs.cols), (2, 3));
        assert_eq!(samples.inputs.row(1), &[250.0, 251.0, 252.0]);
        assert_eq!(samples.targets, vec![4, 0]);
        assert_eq!(samples.classes(), 5);
    }

    #[test]
    fn rejects_count_mismatch() {
        let images: Tensor<u8> = Tensor::zeros(&[2, 1, 1, 1]).unwrap();
        let labels: Tensor<u8> = Tensor::zeros(&[3]).unwrap();
        assert!(matches!(
            Samples::from_tensors(&images, &labels),
            Err(ShapeError::Inconsistent(_))
        ));
    }
}
