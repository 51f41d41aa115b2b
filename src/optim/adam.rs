use crate::{math::matrix::Matrix, layers::linear::Linear};
use crate::optim::Optimizer;

/// First and second moment estimates for one parameter matrix.
struct Moments {
    m: Matrix,
    v: Matrix,
}

impl Moments {
    fn zeros_like(param: &Matrix) -> Moments {
        Moments {
            m: Matrix::zeros(param.rows, param.cols),
            v: Matrix::zeros(param.rows, param.cols),
        }
    }

    /// Updates the moments with `grad` and applies the bias-corrected step
    /// to `param` in place.
    fn update(&mut self, param: &mut Matrix, grad: &Matrix, hp: &Adam, t: i32) {
        let bias1 = 1.0 - hp.beta1.powi(t);
        let bias2 = 1.0 - hp.beta2.powi(t);
        for i in 0..grad.data.len() {
            let g = grad.data[i];
            self.m.data[i] = hp.beta1 * self.m.data[i] + (1.0 - hp.beta1) * g;
            self.v.data[i] = hp.beta2 * self.v.data[i] + (1.0 - hp.beta2) * g * g;
            let m_hat = self.m.data[i] / bias1;
            let v_hat = self.v.data[i] / bias2;
            param.data[i] -= hp.learning_rate * m_hat / (v_hat.sqrt() + hp.eps);
        }
    }
}

/// Adam with bias correction.
///
/// Moment state is created on the first step and belongs to the layer it was
/// created for; stepping a layer of a different shape resets it.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub eps: f64,
    t: i32,
    state: Option<(Moments, Moments)>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam::with_betas(learning_rate, 0.9, 0.999, 1e-8)
    }

    pub fn with_betas(learning_rate: f64, beta1: f64, beta2: f64, eps: f64) -> Adam {
        Adam { learning_rate, beta1, beta2, eps, t: 0, state: None }
    }

    /// Steps taken so far.
    pub fn steps(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layer: &mut Linear, weights_grad: &Matrix, biases_grad: &Matrix) {
        let fresh = match &self.state {
            Some((w, b)) => {
                w.m.rows != layer.weights.rows
                    || w.m.cols != layer.weights.cols
                    || b.m.cols != layer.biases.cols
            }
            None => true,
        };
        if fresh {
            self.state = Some((
                Moments::zeros_like(&layer.weights),
                Moments::zeros_like(&layer.biases),
            ));
            self.t = 0;
        }

        self.t += 1;
        let t = self.t;
        // Take the state out so `self` can be borrowed for the hyperparameters.
        if let Some((mut w, mut b)) = self.state.take() {
            w.update(&mut layer.weights, weights_grad, self, t);
            b.update(&mut layer.biases, biases_grad, self, t);
            self.state = Some((w, b));
        }
    }
}
