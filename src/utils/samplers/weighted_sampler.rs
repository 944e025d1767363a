use nalgebra::{DMatrix, DVector};
use rand::Rng;

use super::Sampler;
use crate::error::{ParticleError, Result};

/// Draws particle columns with replacement, column `i` chosen with
/// probability proportional to `weights[i]`.
///
/// Borrowing the particle matrix keeps draws allocation-free apart from the
/// returned columns; the cumulative weights are built once per sampler.
pub struct WeightedSampler<'a> {
    particles: &'a DMatrix<f64>,
    partial_sums: Vec<f64>,
}

impl<'a> WeightedSampler<'a> {
    /// `weights` needs one finite, non-negative entry per column of
    /// `particles`, with a positive sum.
    pub fn new(particles: &'a DMatrix<f64>, weights: &DVector<f64>) -> Result<Self> {
        if weights.is_empty() || weights.len() != particles.ncols() {
            return Err(ParticleError::DimensionMismatch {
                expected: particles.ncols(),
                found: weights.len(),
            });
        }
        if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
            return Err(ParticleError::InvalidWeights(
                "weights must be finite and non-negative".into(),
            ));
        }

        let mut partial_sums = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &w in weights.iter() {
            total += w;
            partial_sums.push(total);
        }
        if !(total.is_finite() && total > 0.0) {
            return Err(ParticleError::InvalidWeights(format!(
                "weights sum to {total}"
            )));
        }

        Ok(Self {
            particles,
            partial_sums,
        })
    }

    /// Index of one weighted draw.
    pub fn sample_index<R: Rng>(&self, rng: &mut R) -> usize {
        let last = self.partial_sums.len() - 1;
        let target = rng.random::<f64>() * self.partial_sums[last];
        // First index whose cumulative weight exceeds the target; zero-weight
        // particles share their predecessor's partial sum and are never hit.
        self.partial_sums
            .partition_point(|&x| x <= target)
            .min(last)
    }
}

impl Sampler for WeightedSampler<'_> {
    fn dims(&self) -> usize {
        self.particles.nrows()
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> DVector<f64> {
        self.particles.column(self.sample_index(rng)).into_owned()
    }

    fn sample_batch<R: Rng>(&self, rng: &mut R, n: usize) -> DMatrix<f64> {
        let mut draws = DMatrix::zeros(self.dims(), n);
        for j in 0..n {
            let idx = self.sample_index(rng);
            draws.set_column(j, &self.particles.column(idx));
        }
        draws
    }
}
