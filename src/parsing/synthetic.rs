use super::{
    DatasetLoader, RawDataset, RawSplit, IMAGE_COLS, IMAGE_ROWS, NUM_CLASSES, TEST_SAMPLES,
    TRAIN_SAMPLES,
};
use crate::error::Result;
use log::info;
use ndarray::{Array, Array1, Array3};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How synthetic pixels and labels are produced
#[derive(Debug, Clone, Copy)]
pub enum Synthesis {
    /// Every pixel and every label takes the given value
    Fill { pixel: u8, label: u8 },
    /// Pixels and labels are drawn uniformly from a seeded generator
    Random { seed: u64 },
}

/// Generates in-memory datasets with the same shapes as Fashion-MNIST
pub struct SyntheticLoader {
    pub train_samples: usize,
    pub test_samples: usize,
    pub synthesis: Synthesis,
}

impl SyntheticLoader {
    pub fn new(synthesis: Synthesis) -> SyntheticLoader {
        SyntheticLoader {
            train_samples: TRAIN_SAMPLES,
            test_samples: TEST_SAMPLES,
            synthesis,
        }
    }

    fn generate(&self, samples: usize, rng: &mut StdRng) -> Result<RawSplit> {
        let shape = (samples, IMAGE_ROWS, IMAGE_COLS);

        let (images, labels): (Array3<u8>, Array1<u8>) = match self.synthesis {
            Synthesis::Fill { pixel, label } => {
                (Array::from_elem(shape, pixel), Array::from_elem(samples, label))
            }
            Synthesis::Random { .. } => {
                let pixels = Uniform::new_inclusive(0u8, 255);
                let classes = Uniform::new(0u8, NUM_CLASSES as u8);
                (
                    Array::from_shape_simple_fn(shape, || pixels.sample(rng)),
                    Array::from_shape_simple_fn(samples, || classes.sample(rng)),
                )
            }
        };

        RawSplit::new(images, labels)
    }
}

impl DatasetLoader for SyntheticLoader {
    fn load(&self) -> Result<RawDataset> {
        info!(
            "Generating synthetic dataset ({} train, {} test, {:?})",
            self.train_samples, self.test_samples, self.synthesis
        );

        let seed = match self.synthesis {
            Synthesis::Random { seed } => seed,
            Synthesis::Fill { .. } => 0,
        };
        let mut rng = StdRng::seed_from_u64(seed);

        Ok(RawDataset {
            train: self.generate(self.train_samples, &mut rng)?,
            test: self.generate(self.test_samples, &mut rng)?,
        })
    }
}
