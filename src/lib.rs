//! Sequential Monte Carlo representation of a multivariate Bayesian
//! posterior.
//!
//! A [`ParticlePdf`] holds a cloud of weighted samples over an unknown
//! parameter vector. Callers feed it likelihood vectors computed from their
//! own measurement model; the distribution reweights, watches its effective
//! sample size, and regenerates its particles before they degenerate.
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use particle_pdf_rs::ParticlePdf;
//!
//! let prior = DMatrix::from_fn(1, 1000, |_, j| j as f64 / 999.0);
//! let mut pdf = ParticlePdf::seeded(prior, 7)?;
//!
//! let likelihood: Vec<f64> = (0..1000).map(|j| if j < 10 { 1.0 } else { 0.0 }).collect();
//! pdf.bayesian_update(&likelihood)?;
//!
//! assert!(pdf.just_resampled());
//! assert!(pdf.mean()[0] < 0.02);
//! # Ok::<(), particle_pdf_rs::ParticleError>(())
//! ```

pub mod error;
pub mod logger;
pub mod particle_pdf;

#[macro_use]
pub mod utils;

pub use error::{ParticleError, Result};
pub use particle_pdf::{tuning::TuningParameters, ParticlePdf};
