//! Error types for dataset preparation and training.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or truncated raster header/body.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The first line is not exactly `P5\n`.
    #[error("missing P5 magic line")]
    BadMagic,

    /// The dimensions line is not two decimal integers.
    #[error("malformed dimensions line: {0:?}")]
    BadDimensions(String),

    /// The max-value line is not a decimal integer.
    #[error("malformed max-value line: {0:?}")]
    BadMaxval(String),

    /// Only single-byte samples are supported.
    #[error("max value {0} exceeds 255; only single-byte samples are supported")]
    MaxvalTooLarge(u32),

    /// Fewer than `width * height` sample bytes followed the header.
    #[error("truncated data: expected {expected} sample bytes, got {actual}")]
    Truncated {
        /// Bytes declared by the header.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// The underlying reader failed.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The discovered data does not fit the dataset layout.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// No raster files were found under the root.
    #[error("no .{extension} files found")]
    Empty {
        /// Extension that was searched for.
        extension: String,
    },

    /// The file count does not divide evenly into subjects.
    #[error("found {found} raster files, which is not a multiple of {per_subject} per subject")]
    NotMultiple {
        /// Files discovered.
        found: usize,
        /// Files each subject must contribute.
        per_subject: usize,
    },

    /// The tree yielded a different number of subjects than configured.
    #[error("found {found} subjects, expected {expected}")]
    SubjectCount {
        /// Subjects discovered.
        found: usize,
        /// Subjects required by the layout.
        expected: usize,
    },

    /// More subjects than a `u8` label can name.
    #[error("{0} subjects do not fit in 8-bit labels")]
    TooManySubjects(usize),

    /// The layout itself is inconsistent.
    #[error("invalid layout: {0}")]
    Layout(String),

    /// A decoded image has the wrong dimensions.
    #[error("{path}: image is {width}x{height}, expected {expected_width}x{expected_height}")]
    ImageSize {
        /// Offending file.
        path: PathBuf,
        /// Decoded width.
        width: usize,
        /// Decoded height.
        height: usize,
        /// Layout width.
        expected_width: usize,
        /// Layout height.
        expected_height: usize,
    },

    /// A computed slot fell outside its tensor.
    #[error("slot {slot} out of range for {len} entries")]
    SlotOutOfRange {
        /// Computed slot.
        slot: usize,
        /// Entries in the target tensor.
        len: usize,
    },

    /// Tensor data length disagrees with its declared shape.
    #[error("tensor of shape {shape:?} holds {actual} values, expected {expected}")]
    TensorLength {
        /// Declared shape.
        shape: Vec<usize>,
        /// Product of the shape.
        expected: usize,
        /// Values present.
        actual: usize,
    },

    /// The product of a tensor shape does not fit in memory indices.
    #[error("tensor shape {shape:?} is too large")]
    ShapeOverflow {
        /// Declared shape.
        shape: Vec<usize>,
    },

    /// Tensors that must agree do not.
    #[error("inconsistent dataset: {0}")]
    Inconsistent(String),
}

/// Top-level error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A raster file failed to decode.
    #[error("{path}: {source}")]
    Format {
        /// File being decoded.
        path: PathBuf,
        /// Decode failure.
        #[source]
        source: FormatError,
    },

    /// Data did not fit the expected shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure.
    #[error("serialization error on {path}: {source}")]
    Serialization {
        /// Path involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration could not be loaded.
    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Wraps a decode error with the file it occurred in.
    pub fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Self::Format { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
