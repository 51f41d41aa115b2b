use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use ferrite_faces::dataset::{self, store};
use ferrite_faces::optim::OptimizerKind;
use ferrite_faces::train::{train_on_split, Samples};
use ferrite_faces::{rng, Classifier, Config, RasterImage};

#[derive(Parser, Debug)]
#[command(
    name = "ferrite-faces",
    version,
    about = "Build a face-identity dataset from PGM rasters and train a linear classifier on it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index and decode a raster tree, then save the four dataset arrays.
    Prepare(PrepareArgs),
    /// Train a classifier on a prepared dataset and print its accuracy.
    Train(TrainArgs),
    /// Score a saved classifier on a prepared dataset.
    Evaluate(EvaluateArgs),
    /// Write one raster file as a PNG.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Root of the subject folders.
    pub root: PathBuf,
    /// Directory for the dataset files (defaults to the root).
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Require exactly this many subjects.
    #[arg(long)]
    pub subjects: Option<usize>,
    /// TOML or JSON settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding the prepared dataset.
    #[arg(long, default_value = ".")]
    pub data: PathBuf,
    /// TOML or JSON settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub epochs: Option<usize>,
    #[arg(long)]
    pub learning_rate: Option<f64>,
    /// `adam` or `sgd`.
    #[arg(long)]
    pub optimizer: Option<OptimizerKind>,
    /// Mini-batch size; omit to train on the whole set each step.
    #[arg(long)]
    pub batch_size: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Save the trained classifier as JSON.
    #[arg(long)]
    pub model_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Classifier JSON written by `train --model-out`.
    #[arg(long)]
    pub model: PathBuf,
    /// Directory holding the prepared dataset.
    #[arg(long, default_value = ".")]
    pub data: PathBuf,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Raster file to decode.
    pub input: PathBuf,
    /// PNG file to write.
    pub output: PathBuf,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Prepare(args) => run_prepare(args),
            Command::Train(args) => run_train(args),
            Command::Evaluate(args) => run_evaluate(args),
            Command::Preview(args) => run_preview(args),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::from_path(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(Config::default()),
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.subjects.is_some() {
        config.dataset.subjects = args.subjects;
    }

    let split = dataset::prepare(&args.root, &config.dataset)
        .with_context(|| format!("building dataset from {}", args.root.display()))?;

    let out = args.out.unwrap_or_else(|| args.root.clone());
    let paths = store::save_split(&out, &split)
        .with_context(|| format!("saving dataset to {}", out.display()))?;

    let quoted: Vec<String> = paths.iter().map(|p| format!("\"{}\"", p.display())).collect();
    println!("Successfully saved {}", quoted.join(", "));
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.train;
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(lr) = args.learning_rate {
        config.learning_rate = lr;
    }
    if let Some(optimizer) = args.optimizer {
        config.optimizer = optimizer;
    }
    if args.batch_size.is_some() {
        config.batch_size = args.batch_size;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut rng = rng::seeded(config.seed);

    let split = store::load_split(&args.data)
        .with_context(|| format!("loading dataset from {}", args.data.display()))?;

    let bar = ProgressBar::new(config.epochs as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} epochs, loss {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let (model, report) = train_on_split(&split, &config, &mut rng, |stats| {
        bar.set_message(format!("{:.4}", stats.train_loss));
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    if let Some(path) = &args.model_out {
        model
            .save_json(path)
            .with_context(|| format!("saving model to {}", path.display()))?;
        info!("model saved to {}", path.display());
    }

    println!("Performance");
    println!("Train performance: {}", report.train_accuracy);
    println!("Test performance: {}", report.test_accuracy);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let model = Classifier::load_json(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;
    let split = store::load_split(&args.data)
        .with_context(|| format!("loading dataset from {}", args.data.display()))?;

    let train = Samples::from_tensors(&split.train_images, &split.train_labels)?;
    let test = Samples::from_tensors(&split.test_images, &split.test_labels)?;
    anyhow::ensure!(
        train.inputs.cols == model.layer.in_features,
        "model expects {} inputs but the dataset images have {}",
        model.layer.in_features,
        train.inputs.cols
    );

    println!("Train performance: {}", model.accuracy(&train.inputs, &train.targets));
    println!("Test performance: {}", model.accuracy(&test.inputs, &test.targets));
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<()> {
    let raster = RasterImage::open(&args.input)?;
    let image = raster
        .to_gray_image()
        .context("raster is too large to convert")?;
    image
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!(
        "Wrote {}x{} preview to {}",
        raster.width,
        raster.height,
        args.output.display()
    );
    Ok(())
}
