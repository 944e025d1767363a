use log::warn;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::Rng;
use rand_distr::StandardNormal;

use super::Sampler;
use crate::error::{ParticleError, Result};

const MAX_EIGEN_ITERATIONS: usize = 1000;

/// Multivariate normal sampler built from a mean vector and covariance matrix.
///
/// The covariance is factored once as `sigma = L * L^T`, and every draw is
/// `mu + L * z` with `z` standard normal. Positive definite covariances use a
/// Cholesky factor. Positive semi-definite ones (a collapsed particle cloud, a
/// parameter with no spread) fall back to `V * sqrt(max(lambda, 0))` from the
/// symmetric eigendecomposition, so the degenerate directions get no noise.
#[derive(Debug, Clone)]
pub struct GaussianSampler {
    mu: DVector<f64>,
    factor: DMatrix<f64>,
}

impl GaussianSampler {
    pub fn new(mu: DVector<f64>, sigma: DMatrix<f64>) -> Result<Self> {
        if !sigma.is_square() || sigma.nrows() != mu.len() {
            return Err(ParticleError::DimensionMismatch {
                expected: mu.len(),
                found: sigma.nrows(),
            });
        }
        if sigma.iter().any(|x| !x.is_finite()) {
            return Err(ParticleError::CovarianceFactorization);
        }

        let factor = match sigma.clone().cholesky() {
            Some(cholesky) => cholesky.l(),
            None => {
                warn!("Covariance is not positive definite, using eigendecomposition.");
                let eigen = SymmetricEigen::try_new(sigma, f64::EPSILON, MAX_EIGEN_ITERATIONS)
                    .ok_or(ParticleError::CovarianceFactorization)?;
                let roots = eigen.eigenvalues.map(|x| x.max(0.0).sqrt());
                eigen.eigenvectors * DMatrix::from_diagonal(&roots)
            }
        };

        Ok(Self { mu, factor })
    }

    /// Zero-mean sampler, used for additive jitter.
    pub fn centered(sigma: DMatrix<f64>) -> Result<Self> {
        Self::new(DVector::zeros(sigma.nrows()), sigma)
    }
}

impl Sampler for GaussianSampler {
    fn dims(&self) -> usize {
        self.mu.len()
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> DVector<f64> {
        let standard_normal = DVector::from_fn(self.dims(), |_, _| rng.sample(StandardNormal));
        &self.mu + &self.factor * standard_normal
    }

    fn sample_batch<R: Rng>(&self, rng: &mut R, n: usize) -> DMatrix<f64> {
        let standard_normal = DMatrix::from_fn(self.dims(), n, |_, _| rng.sample(StandardNormal));
        let mut samples = &self.factor * standard_normal;
        for mut column in samples.column_iter_mut() {
            column += &self.mu;
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn batch_has_requested_shape() {
        let sampler = GaussianSampler::centered(DMatrix::identity(3, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let batch = sampler.sample_batch(&mut rng, 7);
        assert_eq!(batch.shape(), (3, 7));
    }

    #[test]
    fn batch_matches_moments() {
        let mu = DVector::from_vec(vec![1.0, -2.0]);
        let sigma = DMatrix::from_row_slice(2, 2, &[2.0, 0.6, 0.6, 0.5]);
        let sampler = GaussianSampler::new(mu.clone(), sigma.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let n = 50_000;
        let batch = sampler.sample_batch(&mut rng, n);
        let mean = batch.column_mean();
        assert_abs_diff_eq!(mean[0], mu[0], epsilon = 0.05);
        assert_abs_diff_eq!(mean[1], mu[1], epsilon = 0.05);

        let mut centered = batch.clone();
        for mut column in centered.column_iter_mut() {
            column -= &mean;
        }
        let covariance = &centered * centered.transpose() / n as f64;
        for (estimated, expected) in covariance.iter().zip(sigma.iter()) {
            assert_abs_diff_eq!(*estimated, *expected, epsilon = 0.05);
        }
    }

    #[test]
    fn singular_covariance_falls_back() {
        // Second coordinate has no spread.
        let sigma = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        let sampler = GaussianSampler::centered(sigma).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let batch = sampler.sample_batch(&mut rng, 100);
        assert!(batch.row(1).iter().all(|x| x.abs() < 1e-12));
        assert!(batch.row(0).iter().any(|x| x.abs() > 1e-3));
    }

    #[test]
    fn zero_covariance_gives_constant_samples() {
        let mu = DVector::from_vec(vec![4.0]);
        let sampler = GaussianSampler::new(mu, DMatrix::zeros(1, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_abs_diff_eq!(sampler.sample(&mut rng)[0], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_mismatched_or_non_finite_covariance() {
        assert!(matches!(
            GaussianSampler::new(DVector::zeros(2), DMatrix::identity(3, 3)),
            Err(ParticleError::DimensionMismatch { .. })
        ));
        let sigma = DMatrix::from_element(1, 1, f64::NAN);
        assert_eq!(
            GaussianSampler::centered(sigma).unwrap_err(),
            ParticleError::CovarianceFactorization
        );
    }
}
