pub mod builder;
pub mod indexer;
pub mod layout;
pub mod split;
pub mod store;

pub use builder::build_dataset;
pub use indexer::{assign, by_length_then_name, discover, index_dataset, Assignment, DatasetIndex, IndexedFile, Partition};
pub use layout::DatasetLayout;
pub use split::DatasetSplit;
pub use store::{load_split, save_split};

use std::path::Path;

use crate::error::Result;

/// Indexes and decodes the tree under `root` in one call.
pub fn prepare(root: &Path, layout: &DatasetLayout) -> Result<DatasetSplit> {
    let index = index_dataset(root, layout)?;
    build_dataset(&index, layout)
}
