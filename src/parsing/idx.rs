use super::{DatasetSource, RawDataset};
use crate::error::{Error, Result};
use ndarray::Array2;
use rust_mnist::Mnist;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Images in the IDX distribution are 28x28
pub const NUM_FEATURES: usize = 784;

/// The four files of the original distribution, all expected in one directory
pub const IDX_FILES: [&str; 4] = [
    "train-images-idx3-ubyte",
    "train-labels-idx1-ubyte",
    "t10k-images-idx3-ubyte",
    "t10k-labels-idx1-ubyte",
];

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;
const IMAGE_SIDE: u32 = 28;

/// Magic number and item count expected in each of `IDX_FILES`, in the same order.
/// rust_mnist only accepts the full 60 000 / 10 000 split
const IDX_LAYOUT: [(u32, u32); 4] = [
    (IMAGES_MAGIC, 60_000),
    (LABELS_MAGIC, 60_000),
    (IMAGES_MAGIC, 10_000),
    (LABELS_MAGIC, 10_000),
];

/// Check the big-endian header and the length of one IDX file
fn check_idx_file(path: &Path, magic: u32, count: u32) -> Result<()> {
    let malformed = |reason: String| Error::MalformedIdx {
        path: path.to_path_buf(),
        reason,
    };
    let is_images = magic == IMAGES_MAGIC;
    let header_len = if is_images { 16 } else { 8 };

    let mut file = File::open(path)?;
    let mut header = [0u8; 16];
    file.read_exact(&mut header[..header_len]).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            malformed(format!("header is shorter than {} bytes", header_len))
        } else {
            Error::Io(err)
        }
    })?;

    let field = |i: usize| {
        u32::from_be_bytes([header[4 * i], header[4 * i + 1], header[4 * i + 2], header[4 * i + 3]])
    };

    if field(0) != magic {
        return Err(malformed(format!("magic number {} instead of {}", field(0), magic)));
    }
    if field(1) != count {
        return Err(malformed(format!("{} items instead of {}", field(1), count)));
    }
    if is_images && (field(2) != IMAGE_SIDE || field(3) != IMAGE_SIDE) {
        return Err(malformed(format!(
            "images are {}x{} instead of {}x{}",
            field(2),
            field(3),
            IMAGE_SIDE,
            IMAGE_SIDE
        )));
    }

    let item_len = if is_images { NUM_FEATURES as u64 } else { 1 };
    let expected = header_len as u64 + u64::from(count) * item_len;
    let actual = file.metadata()?.len();
    if actual < expected {
        return Err(malformed(format!(
            "file holds {} bytes, expected at least {}",
            actual, expected
        )));
    }

    Ok(())
}

/// MNIST in its original IDX files. Training samples come first, then the
/// test samples, giving the usual 70 000 sample ordering
pub struct IdxSource {
    dir: PathBuf,
}

impl IdxSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        IdxSource { dir: dir.into() }
    }
}

impl DatasetSource for IdxSource {
    fn fetch(&self) -> Result<RawDataset> {
        // rust_mnist panics on missing or malformed files, so check them all up front
        for name in IDX_FILES {
            let path = self.dir.join(name);
            if !path.is_file() {
                return Err(Error::MissingFile(path));
            }
        }
        for (name, (magic, count)) in IDX_FILES.iter().zip(IDX_LAYOUT) {
            check_idx_file(&self.dir.join(name), magic, count)?;
        }

        // The loader glues file names onto the directory string as-is
        let mut dir = self.dir.to_string_lossy().into_owned();
        if !dir.ends_with(MAIN_SEPARATOR) {
            dir.push(MAIN_SEPARATOR);
        }

        let mnist = Mnist::new(&dir);
        let pixels: Vec<u8> = mnist
            .train_data
            .iter()
            .chain(mnist.test_data.iter())
            .flat_map(|image| image.iter().copied())
            .collect();
        let labels: Vec<i64> = mnist
            .train_labels
            .iter()
            .chain(mnist.test_labels.iter())
            .map(|&label| i64::from(label))
            .collect();

        log::debug!(
            "loaded {} training and {} test images from {}",
            mnist.train_labels.len(),
            mnist.test_labels.len(),
            self.dir.display()
        );

        Ok(RawDataset {
            pixels: Array2::from_shape_vec((labels.len(), NUM_FEATURES), pixels)?,
            labels,
        })
    }

    fn describe(&self) -> String {
        format!("idx directory {}", self.dir.display())
    }
}
