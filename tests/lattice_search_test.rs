//! End-to-end tests of lattice hill climbing.
//!
//! The objective `f(x) = -sum(x_i^2)` on a 5-dimensional lattice of size 10 has
//! its unique maximum `0` at the origin; every chain should end there.

use argmax_mcmc::acceptance::AcceptanceRule;
use argmax_mcmc::core::{run, ChainDriver, ChainOptions};
use argmax_mcmc::ensemble::{self, Selection};
use argmax_mcmc::lattice::{Lattice, LatticeWalk};
use argmax_mcmc::report::NullReporter;
use argmax_mcmc::Termination;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[cfg(test)]
mod tests {
    use super::*;

    const DIM: usize = 5;

    fn neg_square(x: &Vec<usize>) -> f64 {
        -x.iter().map(|&v| (v * v) as f64).sum::<f64>()
    }

    fn walk() -> LatticeWalk {
        LatticeWalk::new(Lattice::new(vec![10; DIM]).unwrap(), 1.0).unwrap()
    }

    #[test]
    fn converges_to_origin_from_any_start() {
        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let init = walk().lattice().random_position(&mut rng);
            let result = run(
                neg_square,
                walk(),
                init,
                ChainOptions::lattice_search(0.01),
                &mut rng,
            )
            .unwrap();
            assert_eq!(result.terminal().state, vec![0; DIM], "seed {seed}");
            assert_eq!(result.terminal().value, 0.0);
            assert_eq!(result.termination(), Termination::Stagnated);
        }
    }

    #[test]
    fn small_tolerances_converge() {
        for tolerance in [0.001, 0.005, 0.01] {
            let mut rng = SmallRng::seed_from_u64(77);
            let result = run(
                neg_square,
                walk(),
                vec![9; DIM],
                ChainOptions::lattice_search(tolerance),
                &mut rng,
            )
            .unwrap();
            assert_eq!(result.terminal().value, 0.0, "tolerance {tolerance}");
        }
    }

    #[test]
    fn large_tolerance_stagnates_before_optimum() {
        // Values stay far from zero, so single steps have relative gains below 0.005.
        let offset_line = |x: &Vec<usize>| -(x[0] as f64 + 100.0);
        let lattice = Lattice::new(vec![50]).unwrap();
        let search = |tolerance: f64, seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            run(
                offset_line,
                LatticeWalk::new(lattice.clone(), 1.0).unwrap(),
                vec![49],
                ChainOptions::lattice_search(tolerance).max_stagnation(60),
                &mut rng,
            )
            .unwrap()
        };
        for seed in 0..3 {
            let fine = search(0.001, seed);
            assert_eq!(fine.terminal().state, vec![0], "seed {seed}");

            let coarse = search(0.5, seed);
            assert_eq!(coarse.termination(), Termination::Stagnated);
            assert!(coarse.terminal().state[0] > 0, "seed {seed}");
            assert!(coarse.terminal().value < fine.terminal().value);
        }
    }

    #[test]
    fn accepted_values_strictly_increase() {
        let mut rng = SmallRng::seed_from_u64(5);
        let result = run(
            neg_square,
            walk(),
            vec![9, 8, 7, 6, 5],
            ChainOptions::lattice_search(0.01),
            &mut rng,
        )
        .unwrap();
        assert!(result.len() > 1);
        for pair in result.chain.windows(2) {
            assert!(pair[1].value > pair[0].value, "{:?}", pair);
        }
    }

    #[test]
    fn flat_objective_stagnates_after_budget() {
        let flat = |_: &Vec<usize>| 0.0;
        for dim in 1..=4 {
            let mut rng = SmallRng::seed_from_u64(dim as u64);
            let lattice = Lattice::new(vec![10; dim]).unwrap();
            let walk = LatticeWalk::new(lattice, 2.0).unwrap();
            let result = run(
                flat,
                walk,
                vec![5; dim],
                ChainOptions::lattice_search(0.01),
                &mut rng,
            )
            .unwrap();
            assert_eq!(result.termination(), Termination::Stagnated);
            assert_eq!(result.stats.steps, 30 * dim);
            assert_eq!(result.stats.accepted, 0);
            assert_eq!(result.accepted_ratio(), 0.0);
            // Only the initial node.
            assert_eq!(result.len(), 1);
        }
    }

    #[test]
    fn clamp_keeps_boundary_coordinate() {
        let lattice = Lattice::new(vec![5]).unwrap();
        assert_eq!(lattice.apply_delta(&[0], &[-3]), vec![0]);
    }

    #[test]
    fn accepted_ratio_is_exact() {
        let mut rng = SmallRng::seed_from_u64(6);
        let result = ChainDriver::new(
            neg_square,
            walk(),
            ChainOptions::new(400)
                .acceptance(AcceptanceRule::RelativeGain { tolerance: 0.01 }),
        )
        .unwrap()
        .run(vec![9; DIM], &mut rng, &mut NullReporter)
        .unwrap();
        let ratio = result.accepted_ratio();
        assert!((0.0..=1.0).contains(&ratio));
        assert_eq!(
            ratio,
            result.stats.accepted as f64 / result.stats.steps as f64
        );
    }

    #[test]
    fn fixed_seed_replays_bit_for_bit() {
        let once = || {
            let mut rng = SmallRng::seed_from_u64(2024);
            run(
                neg_square,
                walk(),
                vec![9, 0, 9, 0, 9],
                ChainOptions::lattice_search(0.01),
                &mut rng,
            )
            .unwrap()
        };
        let (a, b) = (once(), once());
        assert_eq!(a.chain, b.chain);
        assert_eq!(a.terminal, b.terminal);
        assert_eq!(a.stats.steps, b.stats.steps);
    }

    #[test]
    fn ensemble_selects_origin() {
        let result = ensemble::lattice_search(8, neg_square, walk(), 0.01)
            .unwrap()
            .seed(99)
            .parallel(true)
            .max_workers(4)
            .selection(Selection::BestOverTrajectory)
            .run()
            .unwrap();
        assert_eq!(result.best().state, vec![0; DIM]);
        assert_eq!(result.runs().len(), 8);
        assert_eq!(
            ensemble::best_chain(result.runs()).map(|i| result.runs()[i].terminal.value),
            Some(0.0)
        );
    }
}
