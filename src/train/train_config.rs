use serde::{Deserialize, Serialize};

use crate::optim::OptimizerKind;

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `epochs`       : optimizer steps over the training set (full passes)
/// - `learning_rate`: step size handed to the optimizer
/// - `optimizer`    : `adam` or `sgd`
/// - `batch_size`   : `None` trains on the whole set at once; `Some(b)`
///                     shuffles each epoch and steps once per `b` samples
/// - `seed`         : seeds the one RNG created at process start
/// - `log_every`    : epochs between `info!` progress lines; 0 disables them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub optimizer: OptimizerKind,
    pub batch_size: Option<usize>,
    pub seed: u64,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1000,
            learning_rate: 0.001,
            optimizer: OptimizerKind::Adam,
            batch_size: None,
            seed: 0,
            log_every: 100,
        }
    }
}

impl TrainConfig {
    /// Creates a config with the given epoch count and learning rate and
    /// defaults for everything else.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            ..TrainConfig::default()
        }
    }
}
