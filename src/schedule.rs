/*!
Temperature schedules for annealed acceptance.

A schedule maps the step counter of a chain (0, 1, 2, ...) to a positive
temperature. The chain driver asks for exactly one temperature per step, so
the counter restarts with every run and nothing is carried between runs.

```rust
use argmax_mcmc::schedule::{Schedule, TemperatureSchedule};

let cooling = TemperatureSchedule::Geometric { initial: 10.0, ratio: 0.5 };
assert_eq!(cooling.temperature(0), 10.0);
assert_eq!(cooling.temperature(2), 2.5);
```
*/

use std::fmt;
use std::sync::Arc;

use crate::error::{ensure_positive, McmcError, Result};

/// Anything that yields a temperature for a step index.
pub trait Schedule {
    /// Temperature at step `step`.
    fn temperature(&self, step: usize) -> f64;
}

impl<F> Schedule for F
where
    F: Fn(usize) -> f64,
{
    fn temperature(&self, step: usize) -> f64 {
        self(step)
    }
}

/// The built-in cooling schedules plus an escape hatch for arbitrary closures.
#[derive(Clone)]
pub enum TemperatureSchedule {
    /// `T(t) = t0`
    Constant(f64),
    /// `T(t) = max(initial - rate * t, floor)`
    Linear { initial: f64, rate: f64, floor: f64 },
    /// `T(t) = initial * ratio^t`
    Geometric { initial: f64, ratio: f64 },
    /// `T(t) = scale / ln(t + 2)`
    Logarithmic { scale: f64 },
    /// Caller supplied `T(t)`.
    Custom(Arc<dyn Fn(usize) -> f64 + Send + Sync>),
}

impl TemperatureSchedule {
    /// Wraps a closure as a schedule.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        TemperatureSchedule::Custom(Arc::new(f))
    }

    /// Checks the parameters of the built-in schedules. Custom schedules
    /// cannot be checked ahead of time; a bad temperature at run time makes
    /// that step greedy instead.
    pub fn validate(&self) -> Result<()> {
        match *self {
            TemperatureSchedule::Constant(t) => ensure_positive("temperature", t),
            TemperatureSchedule::Linear {
                initial,
                rate,
                floor,
            } => {
                ensure_positive("initial_temperature", initial)?;
                ensure_positive("floor_temperature", floor)?;
                if !(rate.is_finite() && rate >= 0.0) {
                    return Err(McmcError::config("cooling_rate", rate, "must be >= 0"));
                }
                Ok(())
            }
            TemperatureSchedule::Geometric { initial, ratio } => {
                ensure_positive("initial_temperature", initial)?;
                if !(ratio > 0.0 && ratio <= 1.0) {
                    return Err(McmcError::config("cooling_ratio", ratio, "must lie in (0, 1]"));
                }
                Ok(())
            }
            TemperatureSchedule::Logarithmic { scale } => ensure_positive("scale", scale),
            TemperatureSchedule::Custom(_) => Ok(()),
        }
    }
}

impl Schedule for TemperatureSchedule {
    fn temperature(&self, step: usize) -> f64 {
        match self {
            TemperatureSchedule::Constant(t) => *t,
            TemperatureSchedule::Linear {
                initial,
                rate,
                floor,
            } => (initial - rate * step as f64).max(*floor),
            TemperatureSchedule::Geometric { initial, ratio } => {
                initial * ratio.powf(step as f64)
            }
            TemperatureSchedule::Logarithmic { scale } => scale / ((step + 2) as f64).ln(),
            TemperatureSchedule::Custom(f) => f(step),
        }
    }
}

impl fmt::Debug for TemperatureSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureSchedule::Constant(t) => f.debug_tuple("Constant").field(t).finish(),
            TemperatureSchedule::Linear {
                initial,
                rate,
                floor,
            } => f
                .debug_struct("Linear")
                .field("initial", initial)
                .field("rate", rate)
                .field("floor", floor)
                .finish(),
            TemperatureSchedule::Geometric { initial, ratio } => f
                .debug_struct("Geometric")
                .field("initial", initial)
                .field("ratio", ratio)
                .finish(),
            TemperatureSchedule::Logarithmic { scale } => {
                f.debug_struct("Logarithmic").field("scale", scale).finish()
            }
            TemperatureSchedule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
