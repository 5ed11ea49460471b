pub mod error;
pub mod parsing;
pub mod preprocess;
pub mod report;

pub use error::{PrepError, Result};
