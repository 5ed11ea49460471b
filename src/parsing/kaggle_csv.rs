use super::{DatasetLoader, RawDataset, RawSplit, IMAGE_COLS, IMAGE_ROWS, NUM_PIXELS};
use crate::error::{PrepError, Result};
use log::{debug, info};
use ndarray::{Array1, Array3};
use std::io::Read;
use std::path::{Path, PathBuf};

const LINE_SIZE: usize = NUM_PIXELS + 1;

pub const TRAIN_CSV: &str = "fashion-mnist_train.csv";
pub const TEST_CSV: &str = "fashion-mnist_test.csv";

/// Parse a CSV dataset. Rows are stored in the format: <label>,<pixel1>,<pixel2>,...
/// and the first row is a header
/// The dataset is taken from here https://www.kaggle.com/datasets/zalando-research/fashionmnist
pub fn parse_dataset<R: Read>(reader: R) -> Result<RawSplit> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut pixels = Vec::new();
    let mut labels = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());

        if record.len() != LINE_SIZE {
            return Err(PrepError::MalformedRecord {
                line,
                expected: LINE_SIZE,
                actual: record.len(),
            });
        }

        let values: Vec<u8> = record.deserialize(None)?;
        labels.push(values[0]);
        pixels.extend_from_slice(&values[1..]);
    }

    debug!("Parsed {} CSV records", labels.len());

    let images = Array3::from_shape_vec((labels.len(), IMAGE_ROWS, IMAGE_COLS), pixels)?;

    RawSplit::new(images, Array1::from(labels))
}

pub fn parse_file(path: &Path) -> Result<RawSplit> {
    info!("Reading {:?}", path);
    parse_dataset(std::fs::File::open(path)?)
}

/// Loads the train and test CSV files
pub struct CsvLoader {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

impl CsvLoader {
    /// Use the Kaggle file names inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> CsvLoader {
        CsvLoader {
            train_path: data_dir.join(TRAIN_CSV),
            test_path: data_dir.join(TEST_CSV),
        }
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self) -> Result<RawDataset> {
        Ok(RawDataset {
            train: parse_file(&self.train_path)?,
            test: parse_file(&self.test_path)?,
        })
    }
}
