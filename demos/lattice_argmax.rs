//! Approximates the maximum of `-sum(x_i^2)` on a 5-dimensional lattice with
//! several hill-climbing chains running on a bounded worker pool.

use argmax_mcmc::ensemble::{self, Selection};
use argmax_mcmc::lattice::{Lattice, LatticeWalk};
use rand::{thread_rng, Rng};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const N_CHAINS: usize = 16;
    const TOLERANCE: f64 = 0.01;
    let seed: u64 = thread_rng().gen();

    let lattice = Lattice::new(vec![10; 5])?;
    let walk = LatticeWalk::new(lattice, 1.0)?;
    let objective = |x: &Vec<usize>| -x.iter().map(|&v| (v * v) as f64).sum::<f64>();

    let result = ensemble::lattice_search(N_CHAINS, objective, walk, TOLERANCE)?
        .seed(seed)
        .parallel(true)
        .max_workers(4)
        .selection(Selection::BestOverTrajectory)
        .run_with_progress()?;

    let best = result.best();
    println!("Seed: {seed}");
    println!("Best chain: {}", result.best_index());
    println!("Argmax: {:?} with value {}", best.state, best.value);
    println!("Accepted ratios: {:.3?}", result.accepted_ratios());

    #[cfg(feature = "csv")]
    {
        argmax_mcmc::io::csv::save_csv(result.runs(), "/tmp/lattice_argmax.csv")?;
        println!("Saved chains to /tmp/lattice_argmax.csv");
    }

    Ok(())
}
