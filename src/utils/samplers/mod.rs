use nalgebra::{DMatrix, DVector};
use rand::Rng;

pub mod multivariate_gaussian_sampler;
pub mod weighted_sampler;

/// A source of points in parameter space, driven by a caller-owned generator.
pub trait Sampler {
    /// Dimension of the produced vectors.
    fn dims(&self) -> usize;

    fn sample<R: Rng>(&self, rng: &mut R) -> DVector<f64>;

    /// Draws `n` independent samples, one per column.
    fn sample_batch<R: Rng>(&self, rng: &mut R, n: usize) -> DMatrix<f64> {
        let mut samples = DMatrix::zeros(self.dims(), n);
        for j in 0..n {
            samples.set_column(j, &self.sample(rng));
        }
        samples
    }
}
