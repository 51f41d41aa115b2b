use crate::math::matrix::Matrix;

/// Softmax cross-entropy over raw logits, averaged over the batch.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Mean loss `-log(softmax(z)[y])` over the rows of `logits`.
    ///
    /// `logits`: shape `(n, classes)`
    /// `targets`: class index per row
    pub fn loss(logits: &Matrix, targets: &[usize]) -> f64 {
        let n = logits.rows;
        if n == 0 {
            return 0.0;
        }
        let total: f64 = (0..n)
            .map(|r| {
                let probs = softmax(logits.row(r));
                -(probs[targets[r]] + EPS).ln()
            })
            .sum();
        total / n as f64
    }

    /// Gradient of the mean loss w.r.t. the logits:
    ///   ∂L/∂z = (softmax(z) - onehot(y)) / n
    pub fn derivative(logits: &Matrix, targets: &[usize]) -> Matrix {
        let n = logits.rows;
        let scale = 1.0 / n.max(1) as f64;
        let mut grad = Matrix::zeros(n, logits.cols);
        for r in 0..n {
            let probs = softmax(logits.row(r));
            let out = grad.row_mut(r);
            for (c, p) in probs.into_iter().enumerate() {
                let target = if c == targets[r] { 1.0 } else { 0.0 };
                out[c] = (p - target) * scale;
            }
        }
        grad
    }
}

/// Numerically stable softmax of one row.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the maximum element in a slice. Ties resolve to the first index.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if x <= b => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_is_shift_invariant_and_normalized() {
        let a = softmax(&[1.0, 2.0, 3.0]);
        let b = softmax(&[1001.0, 1002.0, 1003.0]);
        assert!((a.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_logits_give_log_classes() {
        let logits = Matrix::zeros(2, 4);
        let loss = CrossEntropyLoss::loss(&logits, &[0, 3]);
        assert!((loss - 4f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn derivative_rows_sum_to_zero() {
        let logits = Matrix::from_vec(2, 3, vec![0.5, -1.0, 2.0, 0.0, 0.0, 0.0]);
        let grad = CrossEntropyLoss::derivative(&logits, &[2, 1]);
        for r in 0..2 {
            assert!(grad.row(r).iter().sum::<f64>().abs() < 1e-12);
        }
        // Uniform row: (1/3 - 1) / 2 at the target.
        assert!((grad.get(1, 1) - (1.0 / 3.0 - 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let base = vec![0.3, -0.2, 1.1];
        let targets = [1];
        let grad = CrossEntropyLoss::derivative(&Matrix::from_vec(1, 3, base.clone()), &targets);
        let h = 1e-6;
        for c in 0..3 {
            let mut up = base.clone();
            up[c] += h;
            let mut down = base.clone();
            down[c] -= h;
            let numeric = (CrossEntropyLoss::loss(&Matrix::from_vec(1, 3, up), &targets)
                - CrossEntropyLoss::loss(&Matrix::from_vec(1, 3, down), &targets))
                / (2.0 * h);
            assert!((numeric - grad.get(0, c)).abs() < 1e-5);
        }
    }

    #[test]
    fn argmax_of_slice() {
        assert_eq!(argmax(&[0.1, 0.9, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn argmax_prefers_first_of_equal_maxima() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[-1.0, 3.0, 2.0, 3.0]), 1);
    }
}
