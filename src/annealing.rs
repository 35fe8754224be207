/*!
Simulated annealing on top of the chain driver.

[`minimize`] runs one chain on `-cost` with the [`AcceptanceRule::Annealed`]
rule: at step `t` a candidate is accepted iff
`(cost(current) - cost(candidate)) / T(t) > ln(u)`. Recorded chain values are
therefore negated costs.

```rust
use argmax_mcmc::annealing::minimize;
use argmax_mcmc::core::ChainOptions;
use argmax_mcmc::proposals::Gaussian;
use argmax_mcmc::report::NullReporter;
use argmax_mcmc::schedule::TemperatureSchedule;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let cost = |x: &Vec<f64>| (x[0] - 3.0).powi(2);
let schedule = TemperatureSchedule::Geometric { initial: 1.0, ratio: 0.99 };
let mut rng = SmallRng::seed_from_u64(1);

let found = minimize(
    cost,
    Gaussian::new(0.3).unwrap(),
    vec![0.0],
    schedule,
    ChainOptions::new(3_000),
    &mut rng,
    &mut NullReporter,
)
.unwrap();
assert!((found.state[0] - 3.0).abs() < 0.5);
```
*/

use rand::RngCore;

use crate::acceptance::AcceptanceRule;
use crate::core::{ChainDriver, ChainOptions, ChainRun, Objective, State};
use crate::error::Result;
use crate::proposals::Proposal;
use crate::report::Reporter;
use crate::schedule::TemperatureSchedule;

/// Outcome of [`minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum<A> {
    /// State the annealed chain ended in.
    pub state: A,
    pub cost: f64,
    /// The underlying run; its node values are `-cost`.
    pub run: ChainRun<A>,
}

impl<A> Minimum<A> {
    /// Cheapest recorded state, which may differ from the terminal one while
    /// the temperature is still high.
    pub fn lowest(&self) -> (&A, f64) {
        let node = self.run.best();
        (&node.state, -node.value)
    }
}

/// Minimizes `cost` starting from `init_state`, cooling along `schedule`.
///
/// The acceptance rule of `options` is replaced by the annealed one; every
/// other option (iterations, recording, stagnation, deadline) applies as usual.
pub fn minimize<A, C, P, R>(
    cost: C,
    proposal: P,
    init_state: A,
    schedule: TemperatureSchedule,
    options: ChainOptions,
    rng: &mut R,
    reporter: &mut dyn Reporter,
) -> Result<Minimum<A>>
where
    A: State,
    C: Objective<A>,
    P: Proposal<A>,
    R: RngCore,
{
    let options = options.acceptance(AcceptanceRule::Annealed { schedule });
    let negated = |state: &A| -cost.value(state);
    let run = ChainDriver::new(negated, proposal, options)?.run(init_state, rng, reporter)?;
    let terminal = run.terminal().clone();
    tracing::debug!(cost = -terminal.value, steps = run.stats.steps, "annealing finished");
    Ok(Minimum {
        state: terminal.state,
        cost: -terminal.value,
        run,
    })
}
