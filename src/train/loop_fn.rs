use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::split::DatasetSplit;
use crate::error::{Error, Result, ShapeError};
use crate::loss::cross_entropy::{argmax, CrossEntropyLoss};
use crate::math::matrix::Matrix;
use crate::network::classifier::Classifier;
use crate::network::metadata::InputShape;
use crate::optim::Optimizer;
use crate::train::epoch_stats::{EpochStats, TrainReport};
use crate::train::samples::Samples;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `model` for `config.epochs` epochs and returns the mean training
/// loss of the **last completed epoch**.
///
/// # Arguments
/// - `model`    : classifier, modified in place
/// - `train`    : training samples
/// - `optimizer`: applies each update
/// - `config`   : epochs, batch size, logging cadence
/// - `rng`      : shuffles mini-batches; untouched in full-batch mode
/// - `on_epoch` : receives the statistics of every finished epoch
pub fn train_loop<R, F>(
    model: &mut Classifier,
    train: &Samples,
    optimizer: &mut dyn Optimizer,
    config: &TrainConfig,
    rng: &mut R,
    mut on_epoch: F,
) -> Result<f64>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    if train.is_empty() {
        return Err(ShapeError::Inconsistent("training set is empty".to_owned()).into());
    }
    if train.inputs.cols != model.layer.in_features {
        return Err(ShapeError::Inconsistent(format!(
            "samples have {} features but the model expects {}",
            train.inputs.cols, model.layer.in_features
        ))
        .into());
    }
    if let Some(&bad) = train.targets.iter().find(|&&t| t >= model.classes()) {
        return Err(ShapeError::Inconsistent(format!(
            "label {} is out of range for {} classes",
            bad,
            model.classes()
        ))
        .into());
    }
    if config.batch_size == Some(0) {
        return Err(Error::Config("batch_size must be at least 1".to_owned()));
    }

    // The full-batch transpose never changes; build it once.
    let full_t = match config.batch_size {
        None => Some(train.inputs.transpose()),
        Some(_) => None,
    };

    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let (train_loss, train_accuracy) = match &full_t {
            Some(inputs_t) => step_batch(model, &train.inputs, inputs_t, &train.targets, optimizer),
            None => {
                let batch_size = config.batch_size.unwrap_or(train.len());
                run_minibatch_epoch(model, train, optimizer, batch_size, rng)
            }
        };
        last_train_loss = train_loss;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if config.log_every > 0 && (epoch % config.log_every == 0 || epoch == config.epochs) {
            info!(
                "epoch {}/{}: loss {:.6}, train accuracy {:.4}",
                epoch, config.epochs, train_loss, train_accuracy
            );
        } else {
            debug!("epoch {}/{}: loss {:.6}", epoch, config.epochs, train_loss);
        }

        on_epoch(&stats);
    }

    Ok(last_train_loss)
}

/// Builds a classifier for `split`, trains it on the train partition and
/// scores it on both partitions.
///
/// The class count is one more than the largest label in either partition.
pub fn train_on_split<R, F>(
    split: &DatasetSplit,
    config: &TrainConfig,
    rng: &mut R,
    on_epoch: F,
) -> Result<(Classifier, TrainReport)>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    split.validate()?;
    let train = Samples::from_tensors(&split.train_images, &split.train_labels)?;
    let test = Samples::from_tensors(&split.test_images, &split.test_labels)?;

    let (height, width) = split.image_dims();
    let input = InputShape { channels: 1, height, width };
    let classes = train.classes().max(test.classes());
    let mut model = Classifier::new(input, classes, rng);

    info!(
        "training {} -> {} linear classifier on {} samples ({:?}, lr {})",
        input.features(),
        classes,
        train.len(),
        config.optimizer,
        config.learning_rate
    );

    let mut optimizer = config.optimizer.build(config.learning_rate);
    let final_loss = train_loop(&mut model, &train, optimizer.as_mut(), config, rng, on_epoch)?;

    let report = TrainReport {
        epochs: config.epochs,
        final_loss,
        train_accuracy: model.accuracy(&train.inputs, &train.targets),
        test_accuracy: model.accuracy(&test.inputs, &test.targets),
    };
    Ok((model, report))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One forward/backward/update over `inputs`. Returns the pre-update loss
/// and accuracy.
fn step_batch(
    model: &mut Classifier,
    inputs: &Matrix,
    inputs_t: &Matrix,
    targets: &[usize],
    optimizer: &mut dyn Optimizer,
) -> (f64, f64) {
    let logits = model.forward(inputs);
    let loss = CrossEntropyLoss::loss(&logits, targets);
    let accuracy = batch_accuracy(&logits, targets);

    let delta = CrossEntropyLoss::derivative(&logits, targets);
    let (w_grad, b_grad) = model.layer.compute_gradients(inputs_t, &delta);
    optimizer.step(&mut model.layer, &w_grad, &b_grad);

    (loss, accuracy)
}

/// Shuffles sample order and steps once per mini-batch.
/// Returns the sample-weighted mean loss and accuracy.
fn run_minibatch_epoch<R: Rng + ?Sized>(
    model: &mut Classifier,
    train: &Samples,
    optimizer: &mut dyn Optimizer,
    batch_size: usize,
    rng: &mut R,
) -> (f64, f64) {
    let n = train.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let mut total_loss = 0.0;
    let mut total_correct = 0.0;

    for batch in indices.chunks(batch_size) {
        let inputs = train.inputs.select_rows(batch);
        let targets: Vec<usize> = batch.iter().map(|&i| train.targets[i]).collect();
        let (loss, accuracy) = step_batch(model, &inputs, &inputs.transpose(), &targets, optimizer);

        total_loss += loss * batch.len() as f64;
        total_correct += accuracy * batch.len() as f64;
    }

    (total_loss / n as f64, total_correct / n as f64)
}

/// Fraction of rows whose argmax logit equals the target.
fn batch_accuracy(logits: &Matrix, targets: &[usize]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let correct = (0..logits.rows)
        .filter(|&r| argmax(logits.row(r)) == targets[r])
        .count();
    correct as f64 / targets.len() as f64
}
