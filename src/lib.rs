/*!
# argmax-mcmc

Best-effort stochastic maximization with Markov chains: one chain driver,
pluggable acceptance rules and move proposals, and a multi-chain argmax on a
bounded worker pool.

- [`core`]: the chain driver ([`core::run`], [`core::ChainDriver`]) and its options.
- [`acceptance`]: plain-ratio Metropolis, log-ratio Metropolis–Hastings,
  lattice relative gain and annealed acceptance.
- [`proposals`]: Gaussian and step-size adaptive Gaussian walks.
- [`lattice`]: bounded integer lattices and their random walk.
- [`ensemble`]: independent chains in parallel and argmax selection.
- [`annealing`]: simulated annealing of a cost function.
- [`schedule`]: temperature schedules.
- [`report`]: diagnostics side channel (tracing, progress bars).
- [`io`]: CSV export behind the `csv` feature.

## Example

```rust
use argmax_mcmc::core::{run, ChainOptions};
use argmax_mcmc::lattice::{Lattice, LatticeWalk};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let lattice = Lattice::new(vec![10; 5]).unwrap();
let walk = LatticeWalk::new(lattice, 1.0).unwrap();
let objective = |x: &Vec<usize>| -x.iter().map(|&v| (v * v) as f64).sum::<f64>();
let mut rng = SmallRng::seed_from_u64(42);

let result = run(objective, walk, vec![9, 3, 7, 0, 5], ChainOptions::lattice_search(0.01), &mut rng).unwrap();
assert_eq!(result.terminal().state, vec![0; 5]);
assert_eq!(result.terminal().value, 0.0);
```
*/

pub mod acceptance;
pub mod annealing;
pub mod core;
pub mod ensemble;
pub mod error;
pub mod io;
pub mod lattice;
pub mod proposals;
pub mod report;
pub mod schedule;
pub mod stats;

pub use crate::core::{run, ChainDriver, ChainNode, ChainOptions, ChainRun, Recording};
pub use crate::error::{McmcError, Result, Warning};
pub use crate::stats::Termination;
