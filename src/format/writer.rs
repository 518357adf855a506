use super::Header;
use crate::error::Result;
use crate::parsing::{check_lengths, Dataset};
use ndarray::ArrayView2;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `features` and `labels` to `path`, replacing any existing file.
///
/// The lengths are checked before the file is created. A failure halfway
/// through leaves whatever was already written in place
pub fn serialize<P: AsRef<Path>>(
    features: &ArrayView2<f32>,
    labels: &[u8],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    check_lengths(features, labels.len())?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_to(&mut writer, features, labels)?;
    writer.flush()?;

    log::info!("wrote {} samples to {}", labels.len(), path.display());

    Ok(())
}

/// Serialize a whole dataset
pub fn write_dataset<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let labels = match dataset.labels.as_slice() {
        Some(labels) => Cow::Borrowed(labels),
        None => Cow::Owned(dataset.labels.to_vec()),
    };

    serialize(&dataset.features.view(), &labels, path)
}

/// Header, then the features row by row, then the labels
pub fn write_to<W: Write>(writer: &mut W, features: &ArrayView2<f32>, labels: &[u8]) -> Result<()> {
    check_lengths(features, labels.len())?;

    let header = Header::new(features.nrows(), features.ncols());
    log::debug!("header: {:?}", header);
    writer.write_all(&header.to_bytes())?;

    // iter() walks in logical row-major order whatever the memory layout
    for value in features.iter() {
        writer.write_all(&value.to_le_bytes())?;
    }

    writer.write_all(labels)?;

    Ok(())
}
