use ndarray::{Array1, Array3, Axis};

use crate::error::{PrepError, Result};

pub mod fetch;
pub mod idx;
pub mod kaggle_csv;
pub mod synthetic;

pub const IMAGE_ROWS: usize = 28;
pub const IMAGE_COLS: usize = 28;
pub const NUM_PIXELS: usize = IMAGE_ROWS * IMAGE_COLS;
pub const NUM_CLASSES: usize = 10;
pub const TRAIN_SAMPLES: usize = 60_000;
pub const TEST_SAMPLES: usize = 10_000;

const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "T-shirt/top",
    "Trouser",
    "Pullover",
    "Dress",
    "Coat",
    "Sandal",
    "Shirt",
    "Sneaker",
    "Bag",
    "Ankle boot",
];

/// Human readable name of a Fashion-MNIST class
pub fn class_name(label: u8) -> Option<&'static str> {
    CLASS_NAMES.get(label as usize).copied()
}

/// Raw images of shape (N, 28, 28) and their labels of shape (N,)
#[derive(Debug, Clone)]
pub struct RawSplit {
    pub images: Array3<u8>,
    pub labels: Array1<u8>,
}

impl RawSplit {
    /// Pair up images and labels, rejecting mismatched row counts and unknown classes
    pub fn new(images: Array3<u8>, labels: Array1<u8>) -> Result<RawSplit> {
        if images.len_of(Axis(0)) != labels.len() {
            return Err(PrepError::LengthMismatch {
                images: images.len_of(Axis(0)),
                labels: labels.len(),
            });
        }

        if let Some(&label) = labels.iter().find(|&&l| l as usize >= NUM_CLASSES) {
            return Err(PrepError::InvalidLabel(label));
        }

        Ok(RawSplit { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The train/test partition as handed out by a loader
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub train: RawSplit,
    pub test: RawSplit,
}

pub trait DatasetLoader {
    fn load(&self) -> Result<RawDataset>;
}
