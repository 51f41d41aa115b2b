pub mod epoch_stats;
pub mod loop_fn;
pub mod samples;
pub mod train_config;

pub use epoch_stats::{EpochStats, TrainReport};
pub use loop_fn::{train_loop, train_on_split};
pub use samples::Samples;
pub use train_config::TrainConfig;
