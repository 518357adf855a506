use super::{Header, FEATURE_SIZE, HEADER_LEN};
use crate::error::Result;
use crate::parsing::Dataset;
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Read only the 16 byte header of a file
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<Header> {
    let mut file = File::open(path)?;
    let mut bytes = [0u8; HEADER_LEN];
    file.read_exact(&mut bytes)?;

    Ok(Header::from_bytes(bytes))
}

/// Load a file produced by the writer back into memory
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let mut reader = BufReader::new(File::open(path)?);

    read_from(&mut reader)
}

/// Parse the header, the feature region and the label region, in that order.
/// Anything after the labels is ignored
pub fn read_from<R: Read>(reader: &mut R) -> Result<Dataset> {
    let mut bytes = [0u8; HEADER_LEN];
    reader.read_exact(&mut bytes)?;

    let header = Header::from_bytes(bytes);
    let (rows, cols) = header.dims()?;
    log::debug!("reading {} samples of {} features", rows, cols);

    let body = read_region(reader, header.body_len()?)?;
    let features: Vec<f32> = body
        .chunks_exact(FEATURE_SIZE)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    let labels = read_region(reader, rows)?;

    Dataset::new(
        Array2::from_shape_vec((rows, cols), features)?,
        Array1::from(labels),
    )
}

/// Read exactly `len` bytes. The buffer grows with the data actually
/// present, so a lying header cannot force a huge allocation up front
fn read_region<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;

    if buf.len() != len {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", len, buf.len()),
        )
        .into());
    }

    Ok(buf)
}
