//! Weighted-particle approximation of a Bayesian posterior.
//!
//! The methods follow the sequential Monte Carlo scheme of Granade et al.,
//! *New J. Phys.* **14** 103013 (2012): Bayesian reweighting by a caller
//! supplied likelihood, an effective-sample-size test, and Liu-West style
//! regularized resampling.

pub mod statistics;
pub mod tuning;

use log::{debug, trace, warn};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};

use self::tuning::TuningParameters;
use crate::{
    error::{ParticleError, Result},
    lerp,
    utils::samplers::{
        multivariate_gaussian_sampler::GaussianSampler, weighted_sampler::WeightedSampler, Sampler,
    },
};

/// A probability distribution over `n_dims` parameters, represented by
/// `n_particles` weighted samples.
///
/// Particles are stored column-wise in an `n_dims x n_particles` matrix. The
/// weights always sum to one between calls. Each instance owns its random
/// generator, so independent instances never share state.
///
/// Mutating methods validate their inputs before touching any state; a
/// rejected call leaves the distribution as it was.
#[derive(Debug, Clone)]
pub struct ParticlePdf<R = StdRng> {
    particles: DMatrix<f64>,
    weights: DVector<f64>,
    tuning: TuningParameters,
    just_resampled: bool,
    rng: R,
}

impl ParticlePdf<StdRng> {
    /// Creates a distribution from `prior` with uniform weights and an
    /// OS-seeded generator.
    pub fn new(prior: DMatrix<f64>) -> Result<Self> {
        Self::with_rng(prior, StdRng::from_os_rng())
    }

    /// Like [`ParticlePdf::new`], with a reproducible generator.
    pub fn seeded(prior: DMatrix<f64>, seed: u64) -> Result<Self> {
        Self::with_rng(prior, StdRng::seed_from_u64(seed))
    }

    /// Builds the prior from one row of samples per parameter.
    ///
    /// The `j`th entries of all rows together form particle `j`.
    pub fn from_parameter_rows<T: AsRef<[f64]>>(rows: &[T]) -> Result<Self> {
        Self::new(matrix_from_rows(rows)?)
    }
}

impl<R: Rng> ParticlePdf<R> {
    pub fn with_rng(prior: DMatrix<f64>, rng: R) -> Result<Self> {
        check_particles(&prior)?;
        let weights = uniform_weights(prior.ncols());
        Ok(Self {
            particles: prior,
            weights,
            tuning: TuningParameters::default(),
            just_resampled: false,
            rng,
        })
    }

    pub fn with_tuning(mut self, tuning: TuningParameters) -> Result<Self> {
        self.set_tuning(tuning)?;
        Ok(self)
    }

    pub fn particles(&self) -> &DMatrix<f64> {
        &self.particles
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    pub fn n_dims(&self) -> usize {
        self.particles.nrows()
    }

    pub fn n_particles(&self) -> usize {
        self.particles.ncols()
    }

    /// Whether the last resample test regenerated the particles.
    pub fn just_resampled(&self) -> bool {
        self.just_resampled
    }

    pub fn tuning(&self) -> &TuningParameters {
        &self.tuning
    }

    /// Replaces the tuning parameters. Takes effect on the next operation.
    pub fn set_tuning(&mut self, tuning: TuningParameters) -> Result<()> {
        tuning.validate()?;
        self.tuning = tuning;
        Ok(())
    }

    /// Replaces the whole distribution, possibly changing its dimensions.
    ///
    /// Without `weights` every sample gets `1 / n_particles`. Supplied weights
    /// are normalized; they must be finite, non-negative, one per sample, and
    /// not all zero.
    pub fn set_distribution(
        &mut self,
        samples: DMatrix<f64>,
        weights: Option<&[f64]>,
    ) -> Result<()> {
        check_particles(&samples)?;
        let weights = match weights {
            None => uniform_weights(samples.ncols()),
            Some(weights) => normalized_weights(weights, samples.ncols())?,
        };

        debug!(
            "Replacing distribution: {} dims, {} particles.",
            samples.nrows(),
            samples.ncols()
        );
        self.particles = samples;
        self.weights = weights;
        Ok(())
    }

    pub fn mean(&self) -> DVector<f64> {
        statistics::weighted_mean(&self.particles, &self.weights)
    }

    /// Always `n_dims x n_dims`, including the 1-D case.
    pub fn covariance(&self) -> DMatrix<f64> {
        statistics::weighted_covariance(&self.particles, &self.weights)
    }

    pub fn std(&self) -> DVector<f64> {
        statistics::weighted_std(&self.particles, &self.weights)
    }

    pub fn effective_sample_size(&self) -> f64 {
        statistics::effective_sample_size(&self.weights)
    }

    /// Multiplies each weight by the likelihood of the observed outcome for
    /// that particle and renormalizes.
    ///
    /// Fails with [`ParticleError::DegenerateUpdate`] when no particle keeps
    /// any weight. Runs [`ParticlePdf::resample_test`] afterwards if
    /// `auto_resample` is set; if that resample fails, the previous weights
    /// are restored.
    pub fn bayesian_update(&mut self, likelihood: &[f64]) -> Result<()> {
        if likelihood.len() != self.n_particles() {
            return Err(ParticleError::DimensionMismatch {
                expected: self.n_particles(),
                found: likelihood.len(),
            });
        }
        if let Some((index, &value)) = likelihood
            .iter()
            .enumerate()
            .find(|(_, x)| !(x.is_finite() && **x >= 0.0))
        {
            return Err(ParticleError::InvalidLikelihood { index, value });
        }

        let updated = self.weights.component_mul(&DVector::from_column_slice(likelihood));
        let total = updated.sum();
        trace!("Bayesian update normalization: {total}");
        if !(total.is_finite() && total > 0.0) {
            warn!("Rejecting Bayesian update, weighted likelihood sums to {total}.");
            return Err(ParticleError::DegenerateUpdate(total));
        }
        let previous = std::mem::replace(&mut self.weights, updated / total);

        if self.tuning.auto_resample {
            if let Err(err) = self.resample_test() {
                self.weights = previous;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Resamples if the effective sample size has dropped below
    /// `resample_threshold * n_particles`. Returns the new `just_resampled`.
    pub fn resample_test(&mut self) -> Result<bool> {
        let n_eff = self.effective_sample_size();
        let threshold = self.tuning.resample_threshold;
        if n_eff / (self.n_particles() as f64) < threshold {
            debug!(
                "Effective sample size {n_eff:.1} of {} below threshold {threshold}, resampling.",
                self.n_particles()
            );
            self.resample()?;
            self.just_resampled = true;
        } else {
            self.just_resampled = false;
        }
        Ok(self.just_resampled)
    }

    /// Regenerates the particle set while preserving its mean and covariance.
    ///
    /// Particles are drawn with replacement by weight, pulled toward the mean
    /// by `a_param`, then jittered with Gaussian noise of covariance
    /// `(1 - a_param^2) * covariance()`. The shrink cancels the spread added
    /// by the jitter, so the refreshed cloud keeps the same first and second
    /// moments in expectation. Weights become uniform.
    ///
    /// With too few particles, repeated resampling can drop low-probability
    /// regions that matter (sample impoverishment). Symptoms are standard
    /// deviations too small to explain run-to-run scatter of the mean, or
    /// visible jumps in `std()` across a resample.
    pub fn resample(&mut self) -> Result<()> {
        let n_particles = self.n_particles();
        let a_param = self.tuning.a_param;
        let center = self.mean();
        let jitter = GaussianSampler::centered(self.covariance() * (1.0 - a_param * a_param))?;

        let coords = WeightedSampler::new(&self.particles, &self.weights)?
            .sample_batch(&mut self.rng, n_particles);
        let mut nudged = jitter.sample_batch(&mut self.rng, n_particles);
        for (mut column, coord) in nudged.column_iter_mut().zip(coords.column_iter()) {
            column += lerp!(&center, &coord, a_param);
        }

        self.particles = nudged;
        self.weights = uniform_weights(n_particles);
        Ok(())
    }

    /// `n_draws` independent weighted draws, one per column.
    pub fn draw(&mut self, n_draws: usize) -> Result<DMatrix<f64>> {
        if n_draws == 0 {
            return Err(ParticleError::InvalidDrawCount);
        }
        Ok(WeightedSampler::new(&self.particles, &self.weights)?
            .sample_batch(&mut self.rng, n_draws))
    }

    /// A single weighted draw.
    pub fn draw_one(&mut self) -> Result<DVector<f64>> {
        Ok(WeightedSampler::new(&self.particles, &self.weights)?.sample(&mut self.rng))
    }
}

fn uniform_weights(n_particles: usize) -> DVector<f64> {
    DVector::from_element(n_particles, 1.0 / n_particles as f64)
}

fn check_particles(particles: &DMatrix<f64>) -> Result<()> {
    if particles.nrows() == 0 || particles.ncols() == 0 {
        return Err(ParticleError::InvalidShape(format!(
            "need at least one dimension and one particle, got {}x{}",
            particles.nrows(),
            particles.ncols()
        )));
    }
    if particles.iter().any(|x| !x.is_finite()) {
        return Err(ParticleError::NonFiniteParticles);
    }
    Ok(())
}

fn normalized_weights(weights: &[f64], n_particles: usize) -> Result<DVector<f64>> {
    if weights.len() != n_particles {
        return Err(ParticleError::DimensionMismatch {
            expected: n_particles,
            found: weights.len(),
        });
    }
    if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
        return Err(ParticleError::InvalidWeights(
            "weights must be finite and non-negative".into(),
        ));
    }
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(ParticleError::InvalidWeights(format!(
            "weights sum to {total}"
        )));
    }
    Ok(DVector::from_column_slice(weights) / total)
}

fn matrix_from_rows<T: AsRef<[f64]>>(rows: &[T]) -> Result<DMatrix<f64>> {
    let n_particles = rows.first().map_or(0, |row| row.as_ref().len());
    if let Some(row) = rows.iter().find(|row| row.as_ref().len() != n_particles) {
        return Err(ParticleError::InvalidShape(format!(
            "parameter rows must have equal length, found {} and {}",
            n_particles,
            row.as_ref().len()
        )));
    }
    Ok(DMatrix::from_fn(rows.len(), n_particles, |i, j| {
        rows[i].as_ref()[j]
    }))
}
