use super::{DatasetSource, RawDataset};
use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use ndarray::Array2;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

/// MNIST stored as CSV, one sample per line: <label>,<pixel0>,<pixel1>,...
/// The layout is the one from https://www.kaggle.com/datasets/oddrationale/mnist-in-csv
pub struct CsvSource {
    path: PathBuf,
    has_headers: bool,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSource {
            path: path.into(),
            has_headers: true,
        }
    }

    /// Whether the first line holds column names (true by default)
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }
}

impl DatasetSource for CsvSource {
    fn fetch(&self) -> Result<RawDataset> {
        if !self.path.is_file() {
            return Err(Error::MissingFile(self.path.clone()));
        }

        parse_dataset(File::open(&self.path)?, self.has_headers)
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}

/// Parse a single field of a record, reporting the line it came from
fn parse_field<T: FromStr>(field: &str, line: usize, what: &str) -> Result<T> {
    field.trim().parse().map_err(|_| Error::MalformedRecord {
        line,
        reason: format!("{} {:?} is not an integer", what, field),
    })
}

/// Parse a line in the dataset. Return the pixels and the label
fn parse_record(record: &StringRecord, index: usize, line: usize) -> Result<(Vec<u8>, i64)> {
    let mut fields = record.iter();
    let label = match fields.next() {
        Some(field) => parse_field::<i64>(field, line, "label")?,
        None => {
            return Err(Error::MalformedRecord {
                line,
                reason: "empty record".to_string(),
            })
        }
    };

    let mut pixels = Vec::with_capacity(record.len().saturating_sub(1));

    for (column, field) in fields.enumerate() {
        let value = parse_field::<i64>(field, line, "pixel")?;
        let pixel = u8::try_from(value).map_err(|_| Error::PixelOutOfRange {
            index,
            column,
            value,
        })?;

        pixels.push(pixel);
    }

    Ok((pixels, label))
}

/// Read every record from `reader` into a raw dataset.
/// All records must have the same number of fields.
///
/// The feature count comes from the data rows, not the header line, so a
/// file with a header and no rows gives a 0 x 0 dataset whatever columns
/// the header names
pub fn parse_dataset<R: Read>(reader: R, has_headers: bool) -> Result<RawDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .from_reader(reader);
    let mut pixels = Vec::new();
    let mut labels = Vec::new();
    let mut num_features = 0;

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);
        let (row, label) = parse_record(&record, index, line)?;

        num_features = row.len();
        pixels.extend(row);
        labels.push(label);
    }

    if !labels.is_empty() && num_features == 0 {
        log::warn!("{} records carry a label but no pixels", labels.len());
    }

    log::debug!(
        "parsed {} csv records with {} features each",
        labels.len(),
        num_features
    );

    Ok(RawDataset {
        pixels: Array2::from_shape_vec((labels.len(), num_features), pixels)?,
        labels,
    })
}
