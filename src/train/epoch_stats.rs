use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// The loop hands one `EpochStats` to its callback at the end of every
/// epoch; the command line uses this to drive its progress bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch, measured before
    /// each batch's update.
    pub train_loss: f64,
    /// Training accuracy as a fraction in [0, 1], from the same forward passes.
    pub train_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a full training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub epochs: usize,
    /// Training loss of the last epoch.
    pub final_loss: f64,
    /// Accuracy of the trained model on the train partition.
    pub train_accuracy: f64,
    /// Accuracy of the trained model on the test partition.
    pub test_accuracy: f64,
}
