//! Error and warning types shared by every sampler in the crate.

use thiserror::Error;

/// Fatal failures, reported before the first step of a chain is taken.
#[derive(Debug, Error)]
pub enum McmcError {
    /// A numeric parameter is out of its admissible range
    /// (non-positive tolerance, iteration count, step length, ...).
    #[error("invalid configuration: `{parameter}` = {value} ({reason})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The starting point cannot be used: it lies outside the lattice, or its
    /// density is not finite and positive under the plain-ratio rule.
    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    /// The worker pool for parallel chains could not be started.
    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl McmcError {
    pub(crate) fn config(
        parameter: &'static str,
        value: impl std::fmt::Display,
        reason: &'static str,
    ) -> Self {
        McmcError::InvalidConfiguration {
            parameter,
            value: value.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, McmcError>;

/// Per-step anomalies. The offending candidate is treated as rejected and the
/// chain keeps running; the warning only reaches the [`Reporter`](crate::report::Reporter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Warning {
    /// Plain-ratio rule: the candidate's objective value is negative.
    NonPositiveCandidateObjective { step: usize, value: f64 },
    /// The candidate's objective value is NaN.
    NonFiniteCandidateObjective { step: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::NonPositiveCandidateObjective { step, value } => {
                write!(f, "step {step}: candidate objective {value} < 0, rejected")
            }
            Warning::NonFiniteCandidateObjective { step } => {
                write!(f, "step {step}: candidate objective is NaN, rejected")
            }
        }
    }
}

/// Fails with [`McmcError::InvalidConfiguration`] unless `value` is a finite, strictly positive number.
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(McmcError::config(parameter, value, "must be finite and > 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_parameter() {
        let err = ensure_positive("tolerance", 0.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tolerance"), "got {msg}");
        assert!(matches!(err, McmcError::InvalidConfiguration { .. }));
    }

    #[test]
    fn nan_is_not_positive() {
        assert!(ensure_positive("beta", f64::NAN).is_err());
        assert!(ensure_positive("beta", f64::INFINITY).is_err());
        assert!(ensure_positive("beta", 1e-12).is_ok());
    }
}
