use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use topicvec_core::traits::Reducer;
use topicvec_core::vector::check_dim;
use topicvec_core::{Error, Result};

/// Gaussian-free random projection with `±1/sqrt(k)` entries.
///
/// The projection matrix is drawn from `seed` mixed with the target
/// dimension, so the 2D and the interest-space projections of one run are
/// independent but both reproducible.
pub struct RandomProjection {
    seed: u64,
}

impl RandomProjection {
    pub fn new(seed: u64) -> Self { Self { seed } }

    fn matrix(&self, input_dim: usize, target_dim: usize) -> Vec<Vec<f64>> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ (target_dim as u64).rotate_left(32));
        let scale = 1.0 / (target_dim as f64).sqrt();
        (0..input_dim)
            .map(|_| (0..target_dim).map(|_| if rng.gen_bool(0.5) { scale } else { -scale }).collect())
            .collect()
    }
}

impl Reducer for RandomProjection {
    fn reduce(&self, vectors: &[Vec<f64>], target_dim: usize) -> Result<Vec<Vec<f64>>> {
        if target_dim == 0 {
            return Err(Error::InvalidConfig("target dimension must be >= 1".to_string()));
        }
        let Some(first) = vectors.first() else { return Ok(vec![]) };
        let input_dim = first.len();
        let matrix = self.matrix(input_dim, target_dim);
        debug!(rows = vectors.len(), input_dim, target_dim, "projecting");
        vectors
            .iter()
            .map(|row| {
                check_dim(input_dim, row.len())?;
                let mut out = vec![0.0f64; target_dim];
                for (x, weights) in row.iter().zip(&matrix) {
                    for (o, w) in out.iter_mut().zip(weights) { *o += x * w; }
                }
                Ok(out)
            })
            .collect()
    }
}
