use approx::assert_abs_diff_eq;
use fashion_prep::parsing::idx::{
    IdxLoader, TEST_IMAGES, TEST_LABELS, TRAIN_IMAGES, TRAIN_LABELS,
};
use fashion_prep::parsing::synthetic::{Synthesis, SyntheticLoader};
use fashion_prep::parsing::{DatasetLoader, IMAGE_COLS, IMAGE_ROWS, NUM_PIXELS};
use fashion_prep::preprocess::{preprocess, TRAIN_SIZE, VALIDATION_SIZE};
use fashion_prep::report::shape_lines;
use fashion_prep::PrepError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write a gzipped IDX file of unsigned bytes
fn write_idx_gz(path: &Path, dims: &[u32], payload: &[u8]) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::fast());
    encoder.write_all(&[0, 0, 0x08, dims.len() as u8]).unwrap();
    for dim in dims {
        encoder.write_all(&dim.to_be_bytes()).unwrap();
    }
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap();
}

#[test]
/// White images labelled 3 keep their value and label through every stage
fn test_full_size_constant_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let raw = SyntheticLoader::new(Synthesis::Fill { pixel: 255, label: 3 }).load()?;
    let data = preprocess(&raw)?;

    assert_eq!(data.train.images.shape(), &[TRAIN_SIZE, IMAGE_ROWS, IMAGE_COLS, 1]);
    assert_eq!(data.train.labels.shape(), &[TRAIN_SIZE]);
    assert_eq!(
        data.validation.images.shape(),
        &[VALIDATION_SIZE, IMAGE_ROWS, IMAGE_COLS, 1]
    );
    assert_eq!(data.validation.labels.len(), VALIDATION_SIZE);
    assert_eq!(data.test.images.shape(), &[10_000, IMAGE_ROWS, IMAGE_COLS, 1]);
    assert_eq!(data.test.labels.len(), 10_000);

    assert!(data.train.images.iter().all(|&p| p == 1.0));
    assert!(data.validation.images.iter().all(|&p| p == 1.0));
    assert!(data.train.labels.iter().all(|&l| l == 3));

    assert_eq!(
        shape_lines(&data),
        vec![
            "Train shape: (48000, 28, 28, 1)",
            "Validation shape: (12000, 28, 28, 1)",
            "Test shape: (10000, 28, 28, 1)",
        ]
    );

    Ok(())
}

#[test]
/// The validation set is the tail of the training partition, in its original order
fn test_validation_is_ordered_tail() -> Result<(), Box<dyn std::error::Error>> {
    let loader = SyntheticLoader {
        train_samples: VALIDATION_SIZE + 7,
        test_samples: 4,
        synthesis: Synthesis::Random { seed: 7 },
    };
    let raw = loader.load()?;
    let data = preprocess(&raw)?;

    assert_eq!(data.train.len(), 7);
    assert_eq!(data.validation.len(), VALIDATION_SIZE);
    assert_eq!(data.test.len(), 4);

    for i in [0, 1, VALIDATION_SIZE / 2, VALIDATION_SIZE - 1] {
        assert_eq!(data.validation.labels[i], raw.train.labels[7 + i]);
        for (r, c) in [(0, 0), (13, 17), (27, 27)] {
            assert_abs_diff_eq!(
                data.validation.images[[i, r, c, 0]],
                raw.train.images[[7 + i, r, c]] as f32 / 255.0
            );
        }
    }
    assert_eq!(data.train.labels[6], raw.train.labels[6]);
    assert!(data
        .train
        .images
        .iter()
        .chain(data.validation.images.iter())
        .chain(data.test.images.iter())
        .all(|&p| (0.0..=1.0).contains(&p)));

    Ok(())
}

#[test]
/// A cached gzipped IDX directory is loaded without touching the network
fn test_offline_idx_cache() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let train_rows = VALIDATION_SIZE + 2;
    let train_pixels: Vec<u8> = (0..train_rows * NUM_PIXELS)
        .map(|i| (i % 256) as u8)
        .collect();
    let train_labels: Vec<u8> = (0..train_rows).map(|i| (i % 10) as u8).collect();

    let cached = |name: &str| dir.path().join(format!("{}.gz", name));
    write_idx_gz(&cached(TRAIN_IMAGES), &[train_rows as u32, 28, 28], &train_pixels);
    write_idx_gz(&cached(TRAIN_LABELS), &[train_rows as u32], &train_labels);
    write_idx_gz(&cached(TEST_IMAGES), &[1, 28, 28], &[255; NUM_PIXELS]);
    write_idx_gz(&cached(TEST_LABELS), &[1], &[9]);

    let raw = IdxLoader::new(dir.path(), true).load()?;
    let data = preprocess(&raw)?;

    assert_eq!(data.train.len(), 2);
    assert_eq!(data.validation.len(), VALIDATION_SIZE);
    assert_eq!(data.validation.labels[0], 2);
    assert_eq!(data.test.labels.to_vec(), vec![9]);
    assert!(data.test.images.iter().all(|&p| p == 1.0));

    Ok(())
}

#[test]
fn test_offline_idx_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let result = IdxLoader::new(dir.path(), true).load();

    assert!(matches!(result, Err(PrepError::DatasetUnavailable { .. })));
}

#[test]
fn test_too_few_training_samples() {
    let loader = SyntheticLoader {
        train_samples: VALIDATION_SIZE - 1,
        test_samples: 1,
        synthesis: Synthesis::Fill { pixel: 0, label: 0 },
    };
    let raw = loader.load().unwrap();

    assert!(matches!(
        preprocess(&raw),
        Err(PrepError::SplitTooLarge { .. })
    ));
}
