/*!
Finite integer lattices and the bounded random walk used for lattice search.

A lattice `[N_1, ..., N_n]` is never materialized: it only provides the
bounds `0 <= x_i < N_i` for positions `Vec<usize>`.

```rust
use argmax_mcmc::lattice::Lattice;

let lattice = Lattice::new(vec![5]).unwrap();
// Stepping 3 to the left from the origin would leave the lattice,
// so that coordinate keeps its old value.
assert_eq!(lattice.apply_delta(&[0], &[-3]), vec![0]);
assert_eq!(lattice.apply_delta(&[0], &[3]), vec![3]);
```
*/

use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

use crate::error::{ensure_positive, McmcError, Result};
use crate::proposals::Proposal;

/// Per-dimension sizes of an n-dimensional grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lattice {
    sizes: Vec<usize>,
}

impl Lattice {
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(McmcError::config(
                "lattice_size",
                "[]",
                "needs at least one dimension",
            ));
        }
        if let Some(bad) = sizes.iter().find(|&&n| n == 0) {
            return Err(McmcError::config(
                "lattice_size",
                bad,
                "every axis needs at least one point",
            ));
        }
        Ok(Self { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn dimension(&self) -> usize {
        self.sizes.len()
    }

    /// Whether `position` has the lattice's dimension and lies inside its bounds.
    pub fn contains(&self, position: &[usize]) -> bool {
        position.len() == self.sizes.len()
            && position.iter().zip(&self.sizes).all(|(&x, &n)| x < n)
    }

    /// Uniformly random lattice point.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        self.sizes.iter().map(|&n| rng.gen_range(0..n)).collect()
    }

    /// Moves `position` by `delta`, axis by axis. A coordinate that would
    /// leave `[0, N_i)` keeps its previous value while the other axes still move.
    pub fn apply_delta(&self, position: &[usize], delta: &[i64]) -> Vec<usize> {
        position
            .iter()
            .zip(delta)
            .zip(&self.sizes)
            .map(|((&x, &d), &n)| {
                match (x as i64).checked_add(d) {
                    Some(moved) if moved >= 0 && (moved as u64) < n as u64 => moved as usize,
                    _ => x,
                }
            })
            .collect()
    }
}

/// Lattice random walk: each coordinate moves by `round(N(0, 1) * step_length)`,
/// out-of-range coordinates are reverted individually.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeWalk {
    lattice: Lattice,
    step_length: f64,
}

impl LatticeWalk {
    pub fn new(lattice: Lattice, step_length: f64) -> Result<Self> {
        ensure_positive("step_length", step_length)?;
        Ok(Self {
            lattice,
            step_length,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn step_length(&self) -> f64 {
        self.step_length
    }
}

impl Proposal<Vec<usize>> for LatticeWalk {
    fn propose(&mut self, current: &Vec<usize>, rng: &mut dyn RngCore) -> Vec<usize> {
        let delta: Vec<i64> = current
            .iter()
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                (z * self.step_length).round() as i64
            })
            .collect();
        self.lattice.apply_delta(current, &delta)
    }

    fn check_initial(&self, state: &Vec<usize>) -> Result<()> {
        if self.lattice.contains(state) {
            Ok(())
        } else {
            Err(McmcError::InvalidInitialState(format!(
                "position {state:?} is not on the lattice {:?}",
                self.lattice.sizes
            )))
        }
    }
}
