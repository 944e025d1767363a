use bon::Builder;

use crate::error::{ParticleError, Result};

/// Parameters of the resampling algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct TuningParameters {
    /// Shrinkage toward the distribution mean during resampling. The jitter
    /// covariance is `1 - a_param^2` times the distribution covariance.
    #[builder(default = 0.98)]
    pub a_param: f64,

    /// Resampling triggers when the effective sample size falls below this
    /// fraction of the particle count.
    #[builder(default = 0.5)]
    pub resample_threshold: f64,

    /// Run the resample test after every Bayesian update.
    #[builder(default = true)]
    pub auto_resample: bool,
}

impl TuningParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.a_param > 0.0 && self.a_param <= 1.0) {
            return Err(ParticleError::InvalidTuning(format!(
                "a_param must be in (0, 1], got {}",
                self.a_param
            )));
        }
        if !(self.resample_threshold > 0.0 && self.resample_threshold <= 1.0) {
            return Err(ParticleError::InvalidTuning(format!(
                "resample_threshold must be in (0, 1], got {}",
                self.resample_threshold
            )));
        }
        Ok(())
    }
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[macro_export]
macro_rules! tuning_parameters {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {
        $crate::particle_pdf::tuning::TuningParameters::builder()
            $(.$key($value))*
            .build()
    };
}
pub use tuning_parameters;
