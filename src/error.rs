//! Error types for particle distributions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParticleError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Particle coordinates must be finite")]
    NonFiniteParticles,

    #[error("Dimension mismatch: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid likelihood at particle {index}: {value}")]
    InvalidLikelihood { index: usize, value: f64 },

    #[error("Degenerate update: weighted likelihood sums to {0}")]
    DegenerateUpdate(f64),

    #[error("Invalid tuning parameter: {0}")]
    InvalidTuning(String),

    #[error("Number of draws must be at least 1")]
    InvalidDrawCount,

    #[error("Covariance matrix could not be factorized")]
    CovarianceFactorization,
}

pub type Result<T> = std::result::Result<T, ParticleError>;
