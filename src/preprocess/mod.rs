use crate::error::{PrepError, Result};
use crate::parsing::{RawDataset, RawSplit, IMAGE_COLS, IMAGE_ROWS};
use log::{info, warn};
use ndarray::{s, Array1, Array3, Array4, Axis};

/// Number of training rows held out for validation
pub const VALIDATION_SIZE: usize = 12_000;
/// Number of training rows left after the validation split
pub const TRAIN_SIZE: usize = 48_000;

const GREYSCALE_SIZE: f32 = 255f32;

/// Images of shape (N, 28, 28, 1) with their labels of shape (N,)
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImages {
    pub images: Array4<f32>,
    pub labels: Array1<u8>,
}

impl LabeledImages {
    pub fn new(images: Array4<f32>, labels: Array1<u8>) -> Result<LabeledImages> {
        if images.len_of(Axis(0)) != labels.len() {
            return Err(PrepError::LengthMismatch {
                images: images.len_of(Axis(0)),
                labels: labels.len(),
            });
        }

        Ok(LabeledImages { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Output of the pipeline
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub train: LabeledImages,
    pub validation: LabeledImages,
    pub test: LabeledImages,
}

/// Scale pixels from [0, 255] to [0.0, 1.0]
pub fn normalize(images: &Array3<u8>) -> Array3<f32> {
    images.mapv(|p| f32::from(p) / GREYSCALE_SIZE)
}

/// Append a trailing channel axis: (N, 28, 28) -> (N, 28, 28, 1)
pub fn add_channel_dim(images: Array3<f32>) -> Result<Array4<f32>> {
    let (_, rows, cols) = images.dim();
    if (rows, cols) != (IMAGE_ROWS, IMAGE_COLS) {
        return Err(PrepError::InvalidImageShape { rows, cols });
    }

    Ok(images.insert_axis(Axis(3)))
}

/// Hold out the last `val_size` rows. Returns (train, validation)
pub fn split_validation(
    set: &LabeledImages,
    val_size: usize,
) -> Result<(LabeledImages, LabeledImages)> {
    let total = set.len();
    if val_size > total {
        return Err(PrepError::SplitTooLarge { val_size, total });
    }

    let boundary = total - val_size;
    let train = LabeledImages::new(
        set.images.slice(s![..boundary, .., .., ..]).to_owned(),
        set.labels.slice(s![..boundary]).to_owned(),
    )?;
    let validation = LabeledImages::new(
        set.images.slice(s![boundary.., .., .., ..]).to_owned(),
        set.labels.slice(s![boundary..]).to_owned(),
    )?;

    Ok((train, validation))
}

fn prepare(split: &RawSplit) -> Result<LabeledImages> {
    let images = add_channel_dim(normalize(&split.images))?;
    LabeledImages::new(images, split.labels.clone())
}

/// Normalize and reshape both partitions, then carve the validation set
/// out of the tail of the training partition. Row order is preserved
pub fn preprocess(raw: &RawDataset) -> Result<Preprocessed> {
    let full_train = prepare(&raw.train)?;
    let (train, validation) = split_validation(&full_train, VALIDATION_SIZE)?;
    let test = prepare(&raw.test)?;

    if train.len() != TRAIN_SIZE {
        warn!(
            "Training split has {} samples, the canonical dataset gives {}",
            train.len(),
            TRAIN_SIZE
        );
    }
    info!(
        "Split {} training samples into {} train / {} validation, {} test",
        full_train.len(),
        train.len(),
        validation.len(),
        test.len()
    );

    Ok(Preprocessed {
        train,
        validation,
        test,
    })
}
