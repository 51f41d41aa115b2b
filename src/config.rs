use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::layout::DatasetLayout;
use crate::error::{Error, Result};
use crate::train::train_config::TrainConfig;

/// Settings loaded from a TOML or JSON file. Every field has a default, so
/// a file only needs the values it changes:
///
/// ```toml
/// [dataset]
/// subjects = 40
///
/// [train]
/// epochs = 500
/// optimizer = "sgd"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetLayout,
    pub train: TrainConfig,
}

impl Config {
    /// Loads configuration from `path`. Files ending in `.json` are parsed
    /// as JSON, anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let is_json = path.extension().map_or(false, |ext| ext == "json");
        let config = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        };
        Ok(config)
    }
}
