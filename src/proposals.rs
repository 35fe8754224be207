/*!
Move proposals: how a candidate is generated from the current state.

A proposal owns whatever tuning state it needs, but never its own random
source: the chain driver lends it the chain's generator on every call, so a
seeded chain replays exactly.

# Examples

```rust
use argmax_mcmc::proposals::{Gaussian, Proposal};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let mut rng = SmallRng::seed_from_u64(42);
let mut proposal = Gaussian::new(0.5).unwrap();
let candidate = proposal.propose(&vec![0.0, 1.0], &mut rng);
assert_eq!(candidate.len(), 2);
```

Any `FnMut(&A, &mut dyn RngCore) -> A` closure is a proposal as well:

```rust
use argmax_mcmc::proposals::Proposal;
use rand::{Rng, RngCore};

let mut coin_walk = |x: &i64, rng: &mut dyn RngCore| if rng.gen_bool(0.5) { x + 1 } else { x - 1 };
let mut rng = rand::thread_rng();
let next = coin_walk.propose(&0, &mut rng);
assert!(next == 1 || next == -1);
```
*/

use num_traits::Float;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, StandardNormal};

use crate::error::{ensure_positive, Result};

/// Generates a candidate next state from the current one.
pub trait Proposal<A> {
    /// Draws a candidate from `q(. | current)`.
    fn propose(&mut self, current: &A, rng: &mut dyn RngCore) -> A;

    /// Rejects states this proposal cannot start from.
    fn check_initial(&self, _state: &A) -> Result<()> {
        Ok(())
    }

    /// Called once at the start of every run.
    fn reset(&mut self) {}

    /// Called after every step with the acceptance outcome.
    fn observe(&mut self, _accepted: bool, _rng: &mut dyn RngCore) {}

    /// Current step size, for proposals that adapt one.
    fn step_size(&self) -> Option<f64> {
        None
    }
}

impl<A, F> Proposal<A> for F
where
    F: FnMut(&A, &mut dyn RngCore) -> A,
{
    fn propose(&mut self, current: &A, rng: &mut dyn RngCore) -> A {
        self(current, rng)
    }
}

/**
Isotropic Gaussian random walk: every coordinate moves by an independent
`N(0, sigma)` draw.

Symmetric, so it can be paired with either the plain-ratio or the log-ratio
rule without a Hastings correction.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian<T> {
    pub sigma: T,
}

impl<T: Float> Gaussian<T> {
    pub fn new(sigma: T) -> Result<Self> {
        ensure_positive("sigma", sigma.to_f64().unwrap_or(f64::NAN))?;
        Ok(Self { sigma })
    }
}

impl<T> Proposal<Vec<T>> for Gaussian<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    fn propose(&mut self, current: &Vec<T>, rng: &mut dyn RngCore) -> Vec<T> {
        current
            .iter()
            .map(|&x| {
                let z: T = rng.sample(StandardNormal);
                x + z * self.sigma
            })
            .collect()
    }
}

/**
Step-size adaptive Gaussian walk.

Proposes `x + N(0, step_size)` per coordinate. After an acceptance the step
size snaps back to `init_step_size`; after a rejection it is multiplied by
`2^N(0, beta)`, so long runs of rejections let the walk widen (or narrow) its
search radius until something is accepted again.

```rust
use argmax_mcmc::proposals::{AdaptiveGaussian, Proposal};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let mut rng = SmallRng::seed_from_u64(0);
let mut sam = AdaptiveGaussian::new(1.0, 0.5).unwrap();
sam.observe(false, &mut rng);
assert_ne!(sam.step_size(), Some(1.0));
sam.observe(true, &mut rng);
assert_eq!(sam.step_size(), Some(1.0));
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveGaussian {
    init_step_size: f64,
    beta: f64,
    step_size: f64,
}

impl AdaptiveGaussian {
    pub fn new(init_step_size: f64, beta: f64) -> Result<Self> {
        ensure_positive("init_step_size", init_step_size)?;
        ensure_positive("beta", beta)?;
        Ok(Self {
            init_step_size,
            beta,
            step_size: init_step_size,
        })
    }

    pub fn init_step_size(&self) -> f64 {
        self.init_step_size
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Proposal<Vec<f64>> for AdaptiveGaussian {
    fn propose(&mut self, current: &Vec<f64>, rng: &mut dyn RngCore) -> Vec<f64> {
        current
            .iter()
            .map(|&x| {
                let z: f64 = rng.sample(StandardNormal);
                x + z * self.step_size
            })
            .collect()
    }

    fn reset(&mut self) {
        self.step_size = self.init_step_size;
    }

    fn observe(&mut self, accepted: bool, rng: &mut dyn RngCore) {
        if accepted {
            self.step_size = self.init_step_size;
        } else {
            let power: f64 = rng.sample::<f64, _>(StandardNormal) * self.beta;
            // Keep the walk alive after extreme drift.
            self.step_size = (self.step_size * power.exp2()).clamp(f64::MIN_POSITIVE, f64::MAX);
        }
    }

    fn step_size(&self) -> Option<f64> {
        Some(self.step_size)
    }
}
