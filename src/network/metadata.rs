use serde::{Deserialize, Serialize};

/// Dimensions of one input image, before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl InputShape {
    pub fn features(&self) -> usize {
        self.channels * self.height * self.width
    }
}

/// Optional annotations attached to a saved classifier.
/// All fields are Option<> so models saved without metadata deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    pub input_shape: Option<InputShape>,
    /// Human-readable class labels for the output layer (e.g. ["s1", ..., "s40"]).
    pub output_labels: Option<Vec<String>>,
}
