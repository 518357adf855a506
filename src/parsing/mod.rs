use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};

pub mod idx;
pub mod mnist;

/// Greyscale intensities are stored as bytes, so 255 is full ink
pub const GREYSCALE_SIZE: f32 = 255f32;

/// What a provider hands back before any conversion: raw intensities and
/// labels in whatever integer width the provider uses
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    pub pixels: Array2<u8>,
    pub labels: Vec<i64>,
}

/// Anything that can produce the raw MNIST samples
pub trait DatasetSource {
    fn fetch(&self) -> Result<RawDataset>;

    /// Human-readable origin of the data, used in logs and error context
    fn describe(&self) -> String;
}

/// Normalized samples (one per row) and their labels
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Array2<f32>,
    pub labels: Array1<u8>,
}

impl Dataset {
    /// Pair a feature matrix with its labels.
    /// Fails if the number of rows differs from the number of labels
    pub fn new(features: Array2<f32>, labels: Array1<u8>) -> Result<Self> {
        check_lengths(&features.view(), labels.len())?;

        Ok(Dataset { features, labels })
    }

    /// Scale the raw intensities into [0, 1] and narrow the labels to bytes
    pub fn from_raw(raw: RawDataset) -> Result<Self> {
        let labels = narrow_labels(&raw.labels)?;
        let features = normalize(&raw.pixels.view());

        Dataset::new(features, labels)
    }

    pub fn num_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    pub fn image(&self, index: usize) -> Option<ArrayView1<f32>> {
        (index < self.num_samples()).then(|| self.features.row(index))
    }

    pub fn label(&self, index: usize) -> Option<u8> {
        self.labels.get(index).copied()
    }

    /// Split into the first `floor(n * ratio)` samples and the rest.
    /// Order is preserved, nothing is shuffled
    pub fn split(&self, ratio: f32) -> Result<(Dataset, Dataset)> {
        if !(0f32..=1f32).contains(&ratio) {
            return Err(Error::InvalidRatio(ratio));
        }

        let at = ((self.num_samples() as f32 * ratio) as usize).min(self.num_samples());
        let head = Dataset {
            features: self.features.slice(s![..at, ..]).to_owned(),
            labels: self.labels.slice(s![..at]).to_owned(),
        };
        let tail = Dataset {
            features: self.features.slice(s![at.., ..]).to_owned(),
            labels: self.labels.slice(s![at..]).to_owned(),
        };

        Ok((head, tail))
    }

    /// Number of samples carrying each of the 256 possible labels
    pub fn label_counts(&self) -> [usize; 256] {
        let mut counts = [0usize; 256];

        for &label in self.labels.iter() {
            counts[usize::from(label)] += 1;
        }

        counts
    }
}

/// Divide every intensity by 255 in single precision
pub fn normalize(pixels: &ArrayView2<u8>) -> Array2<f32> {
    pixels.mapv(|x| f32::from(x) / GREYSCALE_SIZE)
}

/// Convert wide labels to bytes, refusing anything that would be truncated
pub fn narrow_labels(labels: &[i64]) -> Result<Array1<u8>> {
    labels
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u8::try_from(value).map_err(|_| Error::LabelOutOfRange { index, value })
        })
        .collect()
}

pub(crate) fn check_lengths(features: &ArrayView2<f32>, labels: usize) -> Result<()> {
    if features.nrows() != labels {
        return Err(Error::LengthMismatch {
            rows: features.nrows(),
            labels,
        });
    }

    Ok(())
}
