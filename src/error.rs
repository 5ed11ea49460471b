use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Dataset file {path:?} is not cached and downloads are disabled")]
    DatasetUnavailable { path: PathBuf },

    #[error("Invalid IDX magic number: 0x{0:08x}")]
    InvalidMagic(u32),

    #[error("Unsupported IDX element type 0x{0:02x} (only unsigned bytes are supported)")]
    UnsupportedDataType(u8),

    #[error("Expected a {expected}-dimensional IDX tensor, got {actual} dimensions")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IDX dimensions {dims:?} describe a tensor too large to address")]
    TensorTooLarge { dims: Vec<usize> },

    #[error("IDX payload truncated: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed CSV record {line}: expected {expected} fields, got {actual}")]
    MalformedRecord {
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Label {0} is not a valid class (expected 0-9)")]
    InvalidLabel(u8),

    #[error("Image set has {images} rows but label set has {labels}")]
    LengthMismatch { images: usize, labels: usize },

    #[error("Expected images of shape (28, 28), got ({rows}, {cols})")]
    InvalidImageShape { rows: usize, cols: usize },

    #[error("Validation size {val_size} exceeds the {total} available samples")]
    SplitTooLarge { val_size: usize, total: usize },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, PrepError>;
