use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::ShapeError;
use crate::math::matrix::Matrix;

/// Fully connected layer without activation: `z = x W + b`.
///
/// `weights` is `(in_features, out_features)`, `biases` is `(1, out_features)`.
/// Inputs are batches with one sample per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linear {
    pub in_features: usize,
    pub out_features: usize,
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Linear {
    /// Initializes weights and biases uniformly in `[-1/sqrt(in), 1/sqrt(in))`.
    pub fn new<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Linear {
        let bound = 1.0 / (in_features.max(1) as f64).sqrt();
        let weights = Matrix::uniform(in_features, out_features, bound, rng);
        let biases = Matrix::uniform(1, out_features, bound, rng);

        Linear {
            in_features,
            out_features,
            weights,
            biases,
        }
    }

    /// Checks that both parameter matrices agree with the declared feature
    /// counts. Deserialized layers are not trusted until this passes.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        let expected = [
            ("weights", &self.weights, self.in_features, self.out_features),
            ("biases", &self.biases, 1, self.out_features),
        ];
        for (name, m, rows, cols) in expected {
            if m.rows != rows || m.cols != cols || Some(m.data.len()) != rows.checked_mul(cols) {
                return Err(ShapeError::Inconsistent(format!(
                    "{} are {}x{} with {} values, expected {}x{}",
                    name,
                    m.rows,
                    m.cols,
                    m.data.len(),
                    rows,
                    cols
                )));
            }
        }
        Ok(())
    }

    /// Logits for a batch: `(n, in_features) -> (n, out_features)`.
    pub fn forward(&self, inputs: &Matrix) -> Matrix {
        let mut z = inputs.matmul(&self.weights);
        z.add_row(&self.biases);
        z
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    ///
    /// `inputs_t` is the batch transposed, `(in_features, n)`; `delta` is
    /// ∂L/∂z for the batch, `(n, out_features)`.
    pub fn compute_gradients(&self, inputs_t: &Matrix, delta: &Matrix) -> (Matrix, Matrix) {
        let weights_grad = inputs_t.matmul(delta);
        let biases_grad = delta.sum_rows();
        (weights_grad, biases_grad)
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights = self.weights.clone() - weights_grad.map(|x| x * lr);
        self.biases = self.biases.clone() - biases_grad.map(|x| x * lr);
    }
}
