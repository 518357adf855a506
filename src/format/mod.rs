//! The flat binary layout shared by the writer and the reader.
//!
//! ```text
//! [num_samples: u64][num_features: u64]          header, 16 bytes
//! [f32; num_samples * num_features]              features, row-major
//! [u8; num_samples]                              labels
//! ```
//!
//! Every multi-byte value is little-endian. There is no magic number,
//! checksum or version field: the header counts are the only framing.

use crate::error::{Error, Result};

pub mod reader;
pub mod writer;

pub const HEADER_LEN: usize = 16;
pub const FEATURE_SIZE: usize = std::mem::size_of::<f32>();

/// The two counts at the start of every file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub num_samples: u64,
    pub num_features: u64,
}

impl Header {
    pub fn new(num_samples: usize, num_features: usize) -> Self {
        Header {
            num_samples: num_samples as u64,
            num_features: num_features as u64,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..8].copy_from_slice(&self.num_samples.to_le_bytes());
        bytes[8..].copy_from_slice(&self.num_features.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        let mut samples = [0u8; 8];
        let mut features = [0u8; 8];
        samples.copy_from_slice(&bytes[..8]);
        features.copy_from_slice(&bytes[8..]);

        Header {
            num_samples: u64::from_le_bytes(samples),
            num_features: u64::from_le_bytes(features),
        }
    }

    /// Counts as in-memory sizes, failing when the feature region could not be addressed
    pub fn dims(&self) -> Result<(usize, usize)> {
        let overflow = || Error::HeaderOverflow {
            num_samples: self.num_samples,
            num_features: self.num_features,
        };
        let rows = usize::try_from(self.num_samples).map_err(|_| overflow())?;
        let cols = usize::try_from(self.num_features).map_err(|_| overflow())?;

        rows.checked_mul(cols)
            .and_then(|n| n.checked_mul(FEATURE_SIZE))
            .ok_or_else(overflow)?;

        Ok((rows, cols))
    }

    /// Size in bytes of the feature region
    pub fn body_len(&self) -> Result<usize> {
        let (rows, cols) = self.dims()?;
        Ok(rows * cols * FEATURE_SIZE)
    }

    /// Size in bytes of a complete file with this header
    pub fn file_len(&self) -> Result<u64> {
        let (rows, _) = self.dims()?;
        let body = self.body_len()? as u64;

        (HEADER_LEN as u64)
            .checked_add(body)
            .and_then(|n| n.checked_add(rows as u64))
            .ok_or(Error::HeaderOverflow {
                num_samples: self.num_samples,
                num_features: self.num_features,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_are_little_endian() {
        let bytes = Header::new(2, 3).to_bytes();

        assert_eq!(
            bytes,
            [2, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(Header::from_bytes(bytes), Header::new(2, 3));
    }

    #[test]
    fn mnist_sizes() {
        let header = Header::new(70_000, 784);

        assert_eq!(header.body_len().unwrap(), 70_000 * 784 * 4);
        assert_eq!(header.file_len().unwrap(), 16 + 70_000 * 784 * 4 + 70_000);
        assert_eq!(Header::new(0, 0).file_len().unwrap(), 16);
    }

    #[test]
    fn overflowing_header_is_rejected() {
        let header = Header {
            num_samples: u64::MAX,
            num_features: 2,
        };

        assert!(matches!(
            header.dims(),
            Err(Error::HeaderOverflow { .. })
        ));
    }
}
