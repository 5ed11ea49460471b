use super::fetch::{self, DEFAULT_MIRROR};
use super::{DatasetLoader, RawDataset, RawSplit};
use crate::error::{PrepError, Result};
use flate2::read::GzDecoder;
use log::{debug, info};
use ndarray::{Array1, Array3, ArrayD, Ix1, Ix3, IxDyn};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

const UNSIGNED_BYTE: u8 = 0x08;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parse an IDX tensor of unsigned bytes
/// The header is two zero bytes, the element type, the number of dimensions,
/// and then one big-endian u32 per dimension
pub fn read_idx<R: Read>(mut reader: R) -> Result<ArrayD<u8>> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;

    let magic = u32::from_be_bytes(header);
    if header[0] != 0 || header[1] != 0 {
        return Err(PrepError::InvalidMagic(magic));
    }
    if header[2] != UNSIGNED_BYTE {
        return Err(PrepError::UnsupportedDataType(header[2]));
    }

    let mut dims = Vec::with_capacity(header[3] as usize);
    for _ in 0..header[3] {
        let mut dim = [0u8; 4];
        reader.read_exact(&mut dim)?;
        dims.push(u32::from_be_bytes(dim) as usize);
    }

    let len = dims
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| PrepError::TensorTooLarge { dims: dims.clone() })?;

    // Never allocate from the header alone
    let mut payload = Vec::new();
    reader.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        return Err(PrepError::TruncatedPayload {
            expected: len,
            actual: payload.len(),
        });
    }

    debug!("Parsed IDX tensor with dims {:?}", dims);

    Ok(ArrayD::from_shape_vec(IxDyn(&dims), payload)?)
}

/// Parse an IDX image file into an (N, rows, cols) array
pub fn read_images<R: Read>(reader: R) -> Result<Array3<u8>> {
    let tensor = read_idx(reader)?;
    if tensor.ndim() != 3 {
        return Err(PrepError::DimensionMismatch {
            expected: 3,
            actual: tensor.ndim(),
        });
    }

    Ok(tensor.into_dimensionality::<Ix3>()?)
}

/// Parse an IDX label file into an (N,) array
pub fn read_labels<R: Read>(reader: R) -> Result<Array1<u8>> {
    let tensor = read_idx(reader)?;
    if tensor.ndim() != 1 {
        return Err(PrepError::DimensionMismatch {
            expected: 1,
            actual: tensor.ndim(),
        });
    }

    Ok(tensor.into_dimensionality::<Ix1>()?)
}

/// Open a file for IDX parsing, decompressing it on the fly if it is gzipped
pub fn open_idx(path: &Path) -> Result<Box<dyn Read>> {
    let mut reader = BufReader::new(File::open(path)?);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    debug!("Opening {:?} (gzip: {})", path, is_gzip);

    if is_gzip {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Loads the four IDX files from a cache directory, downloading the missing ones
pub struct IdxLoader {
    pub data_dir: PathBuf,
    pub mirror: String,
    pub offline: bool,
}

impl IdxLoader {
    pub fn new(data_dir: impl Into<PathBuf>, offline: bool) -> IdxLoader {
        IdxLoader {
            data_dir: data_dir.into(),
            mirror: DEFAULT_MIRROR.to_string(),
            offline,
        }
    }

    fn load_split(&self, images_name: &str, labels_name: &str) -> Result<RawSplit> {
        let images_path =
            fetch::ensure_cached(&self.data_dir, images_name, &self.mirror, self.offline)?;
        let labels_path =
            fetch::ensure_cached(&self.data_dir, labels_name, &self.mirror, self.offline)?;

        let images = read_images(open_idx(&images_path)?)?;
        let labels = read_labels(open_idx(&labels_path)?)?;

        RawSplit::new(images, labels)
    }
}

impl DatasetLoader for IdxLoader {
    fn load(&self) -> Result<RawDataset> {
        info!("Loading IDX dataset from {:?}", self.data_dir);

        let train = self.load_split(TRAIN_IMAGES, TRAIN_LABELS)?;
        let test = self.load_split(TEST_IMAGES, TEST_LABELS)?;

        Ok(RawDataset { train, test })
    }
}
