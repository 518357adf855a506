use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while fetching, converting or reading a dataset
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("feature matrix has {rows} rows but there are {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("label {value} of sample {index} does not fit in a byte")]
    LabelOutOfRange { index: usize, value: i64 },

    #[error("pixel {column} of sample {index} has intensity {value}, expected 0..=255")]
    PixelOutOfRange {
        index: usize,
        column: usize,
        value: i64,
    },

    #[error("record {line} is malformed: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("missing dataset file {0}")]
    MissingFile(PathBuf),

    #[error("malformed idx file {}: {reason}", .path.display())]
    MalformedIdx { path: PathBuf, reason: String },

    #[error("header claims {num_samples} x {num_features} features, which does not fit in memory")]
    HeaderOverflow { num_samples: u64, num_features: u64 },

    #[error("split ratio {0} is outside [0, 1]")]
    InvalidRatio(f32),
}

pub type Result<T> = std::result::Result<T, Error>;
