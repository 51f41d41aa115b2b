pub mod config;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod persist;
pub mod raster;
pub mod rng;
pub mod train;

// Convenience re-exports
pub use config::Config;
pub use dataset::{DatasetLayout, DatasetSplit};
pub use error::{Error, FormatError, Result, ShapeError};
pub use math::{Matrix, Tensor};
pub use network::Classifier;
pub use optim::{Adam, Optimizer, OptimizerKind, Sgd};
pub use raster::RasterImage;
pub use train::{train_loop, train_on_split, TrainConfig};
