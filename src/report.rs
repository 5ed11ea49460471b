use crate::parsing::{class_name, NUM_CLASSES};
use crate::preprocess::{LabeledImages, Preprocessed};
use json::{object, JsonValue};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Render a shape the way it is printed for inspection, e.g. `(48000, 28, 28, 1)`
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({},)", single),
        dims => {
            let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    }
}

/// The three lines printed on stdout
pub fn shape_lines(data: &Preprocessed) -> Vec<String> {
    vec![
        format!("Train shape: {}", format_shape(data.train.images.shape())),
        format!("Validation shape: {}", format_shape(data.validation.images.shape())),
        format!("Test shape: {}", format_shape(data.test.images.shape())),
    ]
}

/// Number of samples per class, indexed by label
pub fn class_counts(set: &LabeledImages) -> [usize; NUM_CLASSES] {
    let mut counts = [0; NUM_CLASSES];
    for &label in set.labels.iter() {
        counts[label as usize] += 1;
    }
    counts
}

fn split_summary(set: &LabeledImages) -> JsonValue {
    let shape: Vec<usize> = set.images.shape().to_vec();
    let mut classes = object! {};

    for (label, count) in class_counts(set).iter().enumerate() {
        if let Some(name) = class_name(label as u8) {
            classes[name] = (*count).into();
        }
    }

    object! {
        images: shape,
        labels: set.labels.len(),
        classes: classes,
    }
}

/// Build the JSON summary. Keys are train, validation and test
pub fn summary(data: &Preprocessed) -> JsonValue {
    object! {
        train: split_summary(&data.train),
        validation: split_summary(&data.validation),
        test: split_summary(&data.test),
    }
}

/// Write the JSON summary of the splits to `path`
pub fn write_report(path: &Path, data: &Preprocessed) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    file.write_all(summary(data).pretty(2).as_bytes())?;

    Ok(())
}
