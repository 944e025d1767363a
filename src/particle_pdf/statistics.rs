//! Weighted moments of a particle cloud.
//!
//! All functions take the particle matrix (`n_dims x n_particles`, one column
//! per particle) and a weight vector that sums to one.

use nalgebra::{DMatrix, DVector};

/// `sum_i w_i * x_i`.
pub fn weighted_mean(particles: &DMatrix<f64>, weights: &DVector<f64>) -> DVector<f64> {
    particles * weights
}

/// `sum_i w_i * (x_i - mean)(x_i - mean)^T`.
///
/// The weights are treated as a normalized probability mass, so there is no
/// small-sample correction. The result is always `n_dims x n_dims`.
pub fn weighted_covariance(particles: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    let mean = weighted_mean(particles, weights);

    let mut centered = particles.clone();
    for mut column in centered.column_iter_mut() {
        column -= &mean;
    }
    let mut scaled = centered.clone();
    for (mut column, &w) in scaled.column_iter_mut().zip(weights.iter()) {
        column *= w;
    }

    let covariance = scaled * centered.transpose();
    (&covariance + covariance.transpose()) * 0.5
}

/// Square root of the covariance diagonal.
pub fn weighted_std(particles: &DMatrix<f64>, weights: &DVector<f64>) -> DVector<f64> {
    weighted_covariance(particles, weights)
        .diagonal()
        .map(|x| x.max(0.0).sqrt())
}

/// `1 / sum_i w_i^2`; between 1 and `weights.len()` for normalized weights.
pub fn effective_sample_size(weights: &DVector<f64>) -> f64 {
    1.0 / weights.norm_squared()
}
