/*!
Multi-chain search with argmax selection.

An [`Ensemble`] runs `chain_count` independent chains, each with its own
generator seeded as `seed + chain_index`, its own proposal (built by a
factory) and its own initial state (drawn by a sampler from that generator).
Chains share nothing but read-only configuration, so running them on a
worker pool gives exactly the same result as running them one after another.

```rust
use argmax_mcmc::ensemble;
use argmax_mcmc::lattice::{Lattice, LatticeWalk};

let lattice = Lattice::new(vec![10, 10, 10]).unwrap();
let walk = LatticeWalk::new(lattice, 1.0).unwrap();
let neg_square = |x: &Vec<usize>| -x.iter().map(|&v| (v * v) as f64).sum::<f64>();

let result = ensemble::lattice_search(4, neg_square, walk, 0.01)
    .unwrap()
    .seed(7)
    .parallel(true)
    .max_workers(2)
    .run()
    .unwrap();
assert_eq!(result.runs().len(), 4);
assert!(result.best().value <= 0.0);
```
*/

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::core::{ChainDriver, ChainNode, ChainOptions, ChainRun, Objective, State};
use crate::error::{McmcError, Result};
use crate::lattice::LatticeWalk;
use crate::proposals::Proposal;
use crate::report::{ProgressReporter, Reporter, TracingReporter};

/// Which node of each chain competes in the argmax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// The state each chain ended in.
    #[default]
    Terminal,
    /// The best recorded node of each chain.
    BestOverTrajectory,
}

impl Selection {
    fn candidate<'a, A>(&self, run: &'a ChainRun<A>) -> &'a ChainNode<A> {
        match self {
            Selection::Terminal => run.terminal(),
            Selection::BestOverTrajectory => run.best(),
        }
    }
}

/// Index of the run whose terminal value is greatest, first one on ties.
/// `None` for an empty slice.
pub fn best_chain<A>(runs: &[ChainRun<A>]) -> Option<usize> {
    select(runs, Selection::Terminal)
}

fn select<A>(runs: &[ChainRun<A>], selection: Selection) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, run) in runs.iter().enumerate() {
        let value = selection.candidate(run).value;
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// All chains of an ensemble run plus the winner of the argmax.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleRun<A> {
    runs: Vec<ChainRun<A>>,
    best_index: usize,
    selection: Selection,
}

impl<A> EnsembleRun<A> {
    pub fn runs(&self) -> &[ChainRun<A>] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<ChainRun<A>> {
        self.runs
    }

    pub fn best_index(&self) -> usize {
        self.best_index
    }

    pub fn best_run(&self) -> &ChainRun<A> {
        &self.runs[self.best_index]
    }

    /// The winning `(state, value)` under the ensemble's [`Selection`].
    pub fn best(&self) -> &ChainNode<A> {
        self.selection.candidate(self.best_run())
    }

    pub fn accepted_ratios(&self) -> Vec<f64> {
        self.runs.iter().map(ChainRun::accepted_ratio).collect()
    }
}

/**
Builder and runner for a set of independent chains.

- `objective` is shared read-only by every chain.
- `proposal_factory(i)` builds the proposal of chain `i`.
- `init_sampler(i, rng)` draws the initial state of chain `i` from that
  chain's own generator.
*/
#[derive(Debug, Clone)]
pub struct Ensemble<F, Q, S> {
    objective: F,
    proposal_factory: Q,
    init_sampler: S,
    options: ChainOptions,
    chain_count: usize,
    seed: u64,
    parallel: bool,
    max_workers: Option<usize>,
    selection: Selection,
}

impl<F, Q, S> Ensemble<F, Q, S> {
    pub fn new(
        chain_count: usize,
        objective: F,
        proposal_factory: Q,
        init_sampler: S,
        options: ChainOptions,
    ) -> Result<Self> {
        if chain_count == 0 {
            return Err(McmcError::config("chain_count", 0, "must be > 0"));
        }
        options.validate()?;
        Ok(Self {
            objective,
            proposal_factory,
            init_sampler,
            options,
            chain_count,
            seed: rand::thread_rng().gen::<u64>(),
            parallel: false,
            max_workers: None,
            selection: Selection::default(),
        })
    }

    /// Chain `i` is driven by `SmallRng::seed_from_u64(seed + i)`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Caps the worker pool used in parallel mode. Defaults to rayon's thread count.
    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn chain_count(&self) -> usize {
        self.chain_count
    }

    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    fn workers(&self) -> Result<usize> {
        match self.max_workers {
            Some(0) => Err(McmcError::config("max_workers", 0, "must be > 0")),
            Some(n) => Ok(n.min(self.chain_count)),
            None => Ok(rayon::current_num_threads().min(self.chain_count)),
        }
    }

    fn run_one<A, P>(&self, index: usize, reporter: &mut dyn Reporter) -> Result<ChainRun<A>>
    where
        A: State,
        F: Objective<A>,
        Q: Fn(usize) -> P,
        P: Proposal<A>,
        S: Fn(usize, &mut SmallRng) -> A,
    {
        let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(index as u64));
        let init_state = (self.init_sampler)(index, &mut rng);
        let objective = |state: &A| self.objective.value(state);
        let proposal = (self.proposal_factory)(index);
        ChainDriver::new(objective, proposal, self.options.clone())?.run(
            init_state,
            &mut rng,
            reporter,
        )
    }

    fn collect<A, J>(&self, job: J) -> Result<EnsembleRun<A>>
    where
        A: Send,
        F: Sync,
        Q: Sync,
        S: Sync,
        J: Fn(usize) -> Result<ChainRun<A>> + Sync,
    {
        let runs = if self.parallel {
            let workers = self.workers()?;
            tracing::debug!(chains = self.chain_count, workers, "starting worker pool");
            let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
            pool.install(|| {
                (0..self.chain_count)
                    .into_par_iter()
                    .map(&job)
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            (0..self.chain_count).map(&job).collect::<Result<Vec<_>>>()?
        };
        let best_index = select(&runs, self.selection).unwrap_or_default();
        tracing::info!(
            best_index,
            best_value = self.selection.candidate(&runs[best_index]).value,
            "ensemble finished"
        );
        Ok(EnsembleRun {
            runs,
            best_index,
            selection: self.selection,
        })
    }

    /// Runs every chain to termination and selects the best one.
    pub fn run<A, P>(&self) -> Result<EnsembleRun<A>>
    where
        A: State + Send,
        F: Objective<A> + Sync,
        Q: Fn(usize) -> P + Sync,
        P: Proposal<A>,
        S: Fn(usize, &mut SmallRng) -> A + Sync,
    {
        self.collect(|index| self.run_one::<A, P>(index, &mut TracingReporter::for_chain(index)))
    }

    /// Like [`Ensemble::run`], with one progress bar per chain.
    pub fn run_with_progress<A, P>(&self) -> Result<EnsembleRun<A>>
    where
        A: State + Send,
        F: Objective<A> + Sync,
        Q: Fn(usize) -> P + Sync,
        P: Proposal<A>,
        S: Fn(usize, &mut SmallRng) -> A + Sync,
    {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template(
            "{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        self.collect(|index| {
            let bar = multi.add(ProgressBar::new(self.options.iterations as u64));
            bar.set_prefix(format!("Chain {index}"));
            bar.set_style(style.clone());
            let mut reporter = ProgressReporter::new(bar, TracingReporter::for_chain(index));
            self.run_one::<A, P>(index, &mut reporter)
        })
    }
}

/// Lattice hill climbing from uniformly random starting positions, using
/// [`ChainOptions::lattice_search`] and a clone of `walk` for every chain.
pub fn lattice_search<F>(
    chain_count: usize,
    objective: F,
    walk: LatticeWalk,
    tolerance: f64,
) -> Result<
    Ensemble<
        F,
        impl Fn(usize) -> LatticeWalk + Sync,
        impl Fn(usize, &mut SmallRng) -> Vec<usize> + Sync,
    >,
>
where
    F: Fn(&Vec<usize>) -> f64,
{
    let lattice = walk.lattice().clone();
    Ensemble::new(
        chain_count,
        objective,
        move |_: usize| walk.clone(),
        move |_: usize, rng: &mut SmallRng| lattice.random_position(rng),
        ChainOptions::lattice_search(tolerance),
    )
}
