use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::persist::{load_json, save_json_pretty};
use crate::error::Result;
use crate::layers::linear::Linear;
use crate::loss::cross_entropy::argmax;
use crate::math::matrix::Matrix;
use crate::network::metadata::{InputShape, ModelMetadata};

/// Flatten followed by one linear layer producing one logit per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    pub layer: Linear,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl Classifier {
    /// Builds a classifier for images of `input` shape over `classes` subjects.
    pub fn new<R: Rng + ?Sized>(input: InputShape, classes: usize, rng: &mut R) -> Classifier {
        let metadata = ModelMetadata {
            description: Some(format!(
                "linear face classifier, {}x{} grayscale input, {} subjects",
                input.width, input.height, classes
            )),
            input_shape: Some(input),
            output_labels: Some((0..classes).map(|c| format!("s{}", c + 1)).collect()),
        };
        Classifier {
            layer: Linear::new(input.features(), classes, rng),
            metadata,
        }
    }

    pub fn classes(&self) -> usize {
        self.layer.out_features
    }

    /// Logits for a batch of flattened images, one per row.
    pub fn forward(&self, inputs: &Matrix) -> Matrix {
        self.layer.forward(inputs)
    }

    /// Predicted class per row.
    pub fn predict(&self, inputs: &Matrix) -> Vec<usize> {
        let logits = self.forward(inputs);
        (0..logits.rows).map(|r| argmax(logits.row(r))).collect()
    }

    /// Fraction of rows whose predicted class equals the target.
    pub fn accuracy(&self, inputs: &Matrix, targets: &[usize]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        let correct = self
            .predict(inputs)
            .iter()
            .zip(targets)
            .filter(|(p, t)| p == t)
            .count();
        correct as f64 / targets.len() as f64
    }

    /// Serializes the classifier to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        save_json_pretty(path, self)
    }

    /// Deserializes a classifier from a JSON file previously written by
    /// `save_json`, rejecting parameters whose sizes disagree.
    pub fn load_json(path: &Path) -> Result<Classifier> {
        let model: Classifier = load_json(path)?;
        model.layer.check_shape()?;
        Ok(model)
    }
}
