use std::fs;
use std::path::Path;

use ferrite_faces::dataset::{self, store};
use ferrite_faces::train::Samples;
use ferrite_faces::{rng, train_on_split, Classifier, DatasetLayout, OptimizerKind, RasterImage, TrainConfig};

const WIDTH: usize = 4;
const HEIGHT: usize = 3;

/// Subject 0 is bright on the left half, subject 1 on the right half; each
/// pose shifts the intensities a little.
fn face(subject: usize, pose: usize) -> RasterImage {
    let mut data = Vec::with_capacity(WIDTH * HEIGHT);
    for _row in 0..HEIGHT {
        for col in 0..WIDTH {
            let bright = (col < WIDTH / 2) == (subject == 0);
            let value = if bright { 150 + pose * 5 } else { pose * 2 };
            data.push(value as u8);
        }
    }
    RasterImage::from_raw(WIDTH, HEIGHT, data).unwrap()
}

fn write_faces(root: &Path) {
    for subject in 0..2 {
        let dir = root.join(format!("s{}", subject + 1));
        fs::create_dir(&dir).unwrap();
        for pose in 1..=10 {
            fs::write(dir.join(format!("{}.pgm", pose)), face(subject, pose).to_bytes()).unwrap();
        }
    }
}

fn layout() -> DatasetLayout {
    DatasetLayout { width: WIDTH, height: HEIGHT, ..DatasetLayout::default() }
}

#[test]
fn prepare_then_train_separates_subjects() {
    let root = tempfile::tempdir().unwrap();
    write_faces(root.path());
    let split = dataset::prepare(root.path(), &layout()).unwrap();
    store::save_split(root.path(), &split).unwrap();
    let split = store::load_split(root.path()).unwrap();

    let config = TrainConfig { log_every: 0, ..TrainConfig::new(200, 0.01) };
    let mut rng = rng::seeded(config.seed);
    let mut epochs_seen = 0;
    let (model, report) = train_on_split(&split, &config, &mut rng, |_| epochs_seen += 1).unwrap();

    assert_eq!(epochs_seen, 200);
    assert_eq!(model.classes(), 2);
    assert_eq!(model.layer.in_features, WIDTH * HEIGHT);
    assert_eq!(report.train_accuracy, 1.0);
    assert_eq!(report.test_accuracy, 1.0);
}

#[test]
fn saved_model_scores_the_same_after_reload() {
    let root = tempfile::tempdir().unwrap();
    write_faces(root.path());
    let split = dataset::prepare(root.path(), &layout()).unwrap();

    let config = TrainConfig {
        optimizer: OptimizerKind::Adam,
        batch_size: Some(5),
        log_every: 0,
        ..TrainConfig::new(50, 0.01)
    };
    let mut rng = rng::seeded(3);
    let (model, report) = train_on_split(&split, &config, &mut rng, |_| {}).unwrap();

    let path = root.path().join("model.json");
    model.save_json(&path).unwrap();
    let reloaded = Classifier::load_json(&path).unwrap();

    let test = Samples::from_tensors(&split.test_images, &split.test_labels).unwrap();
    assert_eq!(reloaded.accuracy(&test.inputs, &test.targets), report.test_accuracy);
    assert_eq!(reloaded.predict(&test.inputs), model.predict(&test.inputs));
}

#[test]
fn same_seed_reproduces_the_run() {
    let root = tempfile::tempdir().unwrap();
    write_faces(root.path());
    let split = dataset::prepare(root.path(), &layout()).unwrap();
    let config = TrainConfig { batch_size: Some(4), log_every: 0, ..TrainConfig::new(10, 0.01) };

    let run = || {
        let mut rng = rng::seeded(11);
        let (model, report) = train_on_split(&split, &config, &mut rng, |_| {}).unwrap();
        (model.layer.weights, report.final_loss)
    };
    let (w1, l1) = run();
    let (w2, l2) = run();
    assert_eq!(w1, w2);
    assert_eq!(l1, l2);
}
