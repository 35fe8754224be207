/*!
Acceptance rules for the chain driver.

Every rule sees only the objective value of the current state, the value of
the candidate and a uniform draw from the chain's generator:

- [`AcceptanceRule::PlainRatio`]: Metropolis with `alpha = min(1, new / old)`.
  Values are densities and must be non-negative.
- [`AcceptanceRule::LogRatio`]: Metropolis–Hastings for symmetric proposals
  in log space, `new - old > ln(u)`. Values are unnormalized log-densities.
- [`AcceptanceRule::RelativeGain`]: lattice hill climbing, accepts only
  strict improvements whose [`relative_gain`] beats `tolerance * u`.
- [`AcceptanceRule::Annealed`]: log-space Metropolis on `objective / T(step)`.
*/

use rand::Rng;

use crate::error::{ensure_positive, McmcError, Result, Warning};
use crate::schedule::{Schedule, TemperatureSchedule};

/// How a candidate is judged against the current state.
#[derive(Debug, Clone)]
pub enum AcceptanceRule {
    PlainRatio,
    LogRatio,
    RelativeGain { tolerance: f64 },
    Annealed { schedule: TemperatureSchedule },
}

/// Outcome of one acceptance test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Accept,
    Reject,
    /// Rejected because the candidate value is unusable; carries the warning
    /// to report.
    Invalid(Warning),
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

impl Default for AcceptanceRule {
    fn default() -> Self {
        AcceptanceRule::PlainRatio
    }
}

/// Normalized difference used to compare signed lattice values.
///
/// Returns 0 when both values are 0, otherwise `(new - old) / (|new| + |old|)`,
/// which always lies in `[-1, 1]`.
///
/// ```rust
/// use argmax_mcmc::acceptance::relative_gain;
///
/// assert_eq!(relative_gain(0.0, 0.0), 0.0);
/// assert_eq!(relative_gain(-4.0, -2.0), 1.0 / 3.0);
/// assert_eq!(relative_gain(-1.0, 1.0), 1.0);
/// ```
pub fn relative_gain(old_value: f64, new_value: f64) -> f64 {
    if old_value == 0.0 && new_value == 0.0 {
        0.0
    } else {
        (new_value - old_value) / (new_value.abs() + old_value.abs())
    }
}

impl AcceptanceRule {
    /// Checks the rule's own parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            AcceptanceRule::PlainRatio | AcceptanceRule::LogRatio => Ok(()),
            AcceptanceRule::RelativeGain { tolerance } => ensure_positive("tolerance", *tolerance),
            AcceptanceRule::Annealed { schedule } => schedule.validate(),
        }
    }

    /// Checks the objective value at the initial state.
    pub fn check_initial(&self, value: f64) -> Result<()> {
        match self {
            AcceptanceRule::PlainRatio if !(value.is_finite() && value > 0.0) => {
                Err(McmcError::InvalidInitialState(format!(
                    "density at the initial state must be finite and > 0, got {value}"
                )))
            }
            _ if value.is_nan() => Err(McmcError::InvalidInitialState(
                "objective at the initial state is NaN".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Accepts or rejects a candidate at step `step` of the chain.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        step: usize,
        current: f64,
        candidate: f64,
        rng: &mut R,
    ) -> Decision {
        if candidate.is_nan() {
            return Decision::Invalid(Warning::NonFiniteCandidateObjective { step });
        }
        let accepted = match self {
            AcceptanceRule::PlainRatio => {
                if candidate < 0.0 {
                    return Decision::Invalid(Warning::NonPositiveCandidateObjective {
                        step,
                        value: candidate,
                    });
                }
                let alpha = (candidate / current).min(1.0);
                let u: f64 = rng.gen();
                alpha > u
            }
            AcceptanceRule::LogRatio => {
                let u: f64 = rng.gen();
                candidate - current > u.ln()
            }
            AcceptanceRule::RelativeGain { tolerance } => {
                let u: f64 = rng.gen();
                relative_gain(current, candidate) > tolerance * u
            }
            AcceptanceRule::Annealed { schedule } => {
                let temperature = schedule.temperature(step);
                if temperature.is_finite() && temperature > 0.0 {
                    let u: f64 = rng.gen();
                    (candidate - current) / temperature > u.ln()
                } else {
                    candidate > current
                }
            }
        };
        if accepted {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}
