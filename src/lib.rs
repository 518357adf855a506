//! Turn the MNIST digits into one flat little-endian binary file:
//! a two-count header, the normalized pixels as `f32`, then the labels as bytes.

pub mod error;
pub mod format;
pub mod parsing;
pub mod report;

use std::path::Path;

pub use error::{Error, Result};
pub use format::Header;
pub use parsing::{Dataset, DatasetSource, RawDataset};

/// Fetch from `source`, normalize, and write the result to `output`.
/// Returns the header that was written
pub fn prepare<S, P>(source: &S, output: P) -> Result<Header>
where
    S: DatasetSource + ?Sized,
    P: AsRef<Path>,
{
    log::info!("fetching dataset from {}", source.describe());
    let raw = source.fetch()?;
    log::info!(
        "fetched {} samples of {} features",
        raw.pixels.nrows(),
        raw.pixels.ncols()
    );

    let dataset = Dataset::from_raw(raw)?;
    format::writer::write_dataset(&dataset, output)?;

    Ok(Header::new(dataset.num_samples(), dataset.num_features()))
}
