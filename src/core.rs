/*!
# Chain driver

One parameterized Markov-chain loop serves every sampler in the crate. A run
is described by

- an [`Objective`] `A -> f64` (a density, a log-density, or any score to maximize),
- a [`Proposal`] generating candidates,
- a [`ChainOptions`] value: iteration budget, burn-in, recording policy,
  stagnation budget, deadline and the [`AcceptanceRule`].

Each step proposes a candidate, evaluates it, lets the acceptance rule decide
and records the outcome. The loop ends when the iterations are exhausted,
when `max_stagnation * dimension` consecutive candidates were rejected, or
when the deadline passes. A run is not resumable: calling
[`ChainDriver::run`] again starts from scratch.

## Example

```rust
use argmax_mcmc::core::{run, ChainOptions, Recording};
use argmax_mcmc::acceptance::AcceptanceRule;
use argmax_mcmc::proposals::Gaussian;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let density = |x: &Vec<f64>| (-x.iter().map(|v| v * v).sum::<f64>()).exp();
let options = ChainOptions::new(2_000)
    .burn_in(100)
    .recording(Recording::Sparse)
    .acceptance(AcceptanceRule::PlainRatio);
let mut rng = SmallRng::seed_from_u64(42);

let run = run(density, Gaussian::new(0.5).unwrap(), vec![1.0, 1.0], options, &mut rng).unwrap();
assert!(run.accepted_ratio() > 0.0 && run.accepted_ratio() <= 1.0);
assert!(run.best().value <= 1.0);
```
*/

use std::fmt::Debug;
use std::time::{Duration, Instant};

use rand::RngCore;

use crate::acceptance::{AcceptanceRule, Decision};
use crate::error::{McmcError, Result};
use crate::proposals::Proposal;
use crate::report::{Reporter, TracingReporter};
use crate::stats::{RunStats, Termination};

/// A point of the search domain.
///
/// States are cloned whenever they enter the chain, so later changes to the
/// working state never reach recorded history.
pub trait State: Clone + Debug {
    /// Number of coordinates; scales the stagnation budget.
    fn dimension(&self) -> usize;
}

impl<T: Clone + Debug> State for Vec<T> {
    fn dimension(&self) -> usize {
        self.len()
    }
}

impl<T: Clone + Debug, const N: usize> State for [T; N] {
    fn dimension(&self) -> usize {
        N
    }
}

macro_rules! scalar_state {
    ($($t:ty),*) => {
        $(impl State for $t {
            fn dimension(&self) -> usize {
                1
            }
        })*
    };
}

scalar_state!(f32, f64, i32, i64, u32, u64, usize);

/// The function being maximized (or the target density being sampled).
pub trait Objective<A> {
    fn value(&self, state: &A) -> f64;
}

impl<A, F> Objective<A> for F
where
    F: Fn(&A) -> f64,
{
    fn value(&self, state: &A) -> f64 {
        self(state)
    }
}

/// A recorded state with its objective value, evaluated exactly once when the
/// state was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainNode<A> {
    pub state: A,
    pub value: f64,
}

impl<A> ChainNode<A> {
    pub fn new(state: A, value: f64) -> Self {
        Self { state, value }
    }
}

/// Recorded nodes in the order they were appended.
pub type Chain<A> = Vec<ChainNode<A>>;

/// What gets appended to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Recording {
    /// Only accepted states; chain length equals the number of recorded acceptances.
    #[default]
    Sparse,
    /// One node per step, repeating the current state on rejection.
    Dense,
}

/// Configuration of a single chain run.
#[derive(Debug, Clone)]
pub struct ChainOptions {
    /// Upper bound on the number of steps.
    pub iterations: usize,
    /// Number of accepted moves discarded before recording starts.
    pub burn_in: usize,
    pub recording: Recording,
    /// Stop after `max_stagnation * dimension` consecutive rejections.
    pub max_stagnation: Option<usize>,
    /// Wall-clock budget of the run.
    pub deadline: Option<Duration>,
    pub acceptance: AcceptanceRule,
    /// Record the initial state as the first node (only without burn-in).
    pub record_initial: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            iterations: 5_000,
            burn_in: 0,
            recording: Recording::Sparse,
            max_stagnation: None,
            deadline: None,
            acceptance: AcceptanceRule::PlainRatio,
            record_initial: false,
        }
    }
}

impl ChainOptions {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Lattice hill climbing: relative-gain acceptance, a stagnation budget of
    /// 30 rejections per dimension, an effectively unbounded iteration count
    /// and the initial position as the first chain node.
    pub fn lattice_search(tolerance: f64) -> Self {
        Self {
            iterations: usize::MAX,
            max_stagnation: Some(30),
            acceptance: AcceptanceRule::RelativeGain { tolerance },
            record_initial: true,
            ..Self::default()
        }
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    pub fn recording(mut self, recording: Recording) -> Self {
        self.recording = recording;
        self
    }

    pub fn max_stagnation(mut self, max_stagnation: usize) -> Self {
        self.max_stagnation = Some(max_stagnation);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn acceptance(mut self, acceptance: AcceptanceRule) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn record_initial(mut self, record_initial: bool) -> Self {
        self.record_initial = record_initial;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(McmcError::config("iterations", 0, "must be > 0"));
        }
        if self.max_stagnation == Some(0) {
            return Err(McmcError::config("max_stagnation", 0, "must be > 0"));
        }
        self.acceptance.validate()
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRun<A> {
    pub chain: Chain<A>,
    /// State the chain ended in, recorded or not.
    pub terminal: ChainNode<A>,
    pub stats: RunStats,
    /// Step size before the first step and after every step, for proposals
    /// that adapt one. Empty otherwise.
    pub step_sizes: Vec<f64>,
}

impl<A> ChainRun<A> {
    pub fn terminal(&self) -> &ChainNode<A> {
        &self.terminal
    }

    /// Highest-valued recorded node, first one on ties. Falls back to the
    /// terminal node when nothing was recorded.
    pub fn best(&self) -> &ChainNode<A> {
        self.chain
            .iter()
            .fold(None, |best: Option<&ChainNode<A>>, node| match best {
                Some(b) if b.value >= node.value => Some(b),
                _ => Some(node),
            })
            .unwrap_or(&self.terminal)
    }

    pub fn accepted_ratio(&self) -> f64 {
        self.stats.accepted_ratio()
    }

    pub fn termination(&self) -> Termination {
        self.stats.termination
    }

    pub fn final_step_size(&self) -> Option<f64> {
        self.step_sizes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Runs chains for a fixed objective, proposal and configuration.
#[derive(Debug, Clone)]
pub struct ChainDriver<F, P> {
    objective: F,
    proposal: P,
    options: ChainOptions,
}

impl<F, P> ChainDriver<F, P> {
    /// Fails with [`McmcError::InvalidConfiguration`] if `options` do not validate.
    pub fn new(objective: F, proposal: P, options: ChainOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            objective,
            proposal,
            options,
        })
    }

    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    pub fn proposal(&self) -> &P {
        &self.proposal
    }

    /// Runs one chain from `init_state` to termination.
    pub fn run<A, R>(
        &mut self,
        init_state: A,
        rng: &mut R,
        reporter: &mut dyn Reporter,
    ) -> Result<ChainRun<A>>
    where
        A: State,
        F: Objective<A>,
        P: Proposal<A>,
        R: RngCore,
    {
        let options = &self.options;
        self.proposal.check_initial(&init_state)?;
        let init_value = self.objective.value(&init_state);
        options.acceptance.check_initial(init_value)?;
        self.proposal.reset();
        reporter.on_start(&init_state, init_value);

        let stagnation_limit = options
            .max_stagnation
            .map(|m| m.saturating_mul(init_state.dimension().max(1)));
        let start = Instant::now();

        let mut chain = Vec::new();
        if options.record_initial && options.burn_in == 0 {
            chain.push(ChainNode::new(init_state.clone(), init_value));
        }
        let mut step_sizes: Vec<f64> = self.proposal.step_size().into_iter().collect();

        let mut current = init_state;
        let mut current_value = init_value;
        let mut steps = 0;
        let mut accepted = 0;
        let mut rejected_in_a_row = 0;
        let mut termination = Termination::Exhausted;

        for step in 0..options.iterations {
            if let Some(deadline) = options.deadline {
                if start.elapsed() >= deadline {
                    termination = Termination::Deadline;
                    break;
                }
            }

            let candidate = self.proposal.propose(&current, &mut *rng);
            let candidate_value = self.objective.value(&candidate);
            let decision = options
                .acceptance
                .decide(step, current_value, candidate_value, &mut *rng);
            steps += 1;

            if let Decision::Invalid(warning) = &decision {
                reporter.on_warning(warning);
            }
            let is_accept = decision.is_accept();
            self.proposal.observe(is_accept, &mut *rng);
            if let Some(step_size) = self.proposal.step_size() {
                step_sizes.push(step_size);
            }

            if is_accept {
                current = candidate;
                current_value = candidate_value;
                accepted += 1;
                rejected_in_a_row = 0;
                if accepted > options.burn_in {
                    chain.push(ChainNode::new(current.clone(), current_value));
                }
            } else {
                rejected_in_a_row += 1;
                if options.recording == Recording::Dense && accepted > options.burn_in {
                    chain.push(ChainNode::new(current.clone(), current_value));
                }
            }
            reporter.on_step(step, is_accept);

            if stagnation_limit.is_some_and(|limit| rejected_in_a_row >= limit) {
                termination = Termination::Stagnated;
                break;
            }
        }

        let stats = RunStats {
            steps,
            accepted,
            termination,
            elapsed: start.elapsed(),
        };
        reporter.on_finish(&stats);

        Ok(ChainRun {
            chain,
            terminal: ChainNode::new(current, current_value),
            stats,
            step_sizes,
        })
    }
}

/// Runs a single chain, reporting diagnostics through `tracing`.
pub fn run<A, F, P, R>(
    objective: F,
    proposal: P,
    init_state: A,
    options: ChainOptions,
    rng: &mut R,
) -> Result<ChainRun<A>>
where
    A: State,
    F: Objective<A>,
    P: Proposal<A>,
    R: RngCore,
{
    ChainDriver::new(objective, proposal, options)?.run(
        init_state,
        rng,
        &mut TracingReporter::new(),
    )
}
