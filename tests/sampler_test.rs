//! Statistical tests of the continuous samplers.
//!
//! Chains targeting independent Gaussians should reproduce their means and
//! variances; the adaptive walk must follow its step-size rules on every step.

use approx::assert_abs_diff_eq;
use argmax_mcmc::acceptance::AcceptanceRule;
use argmax_mcmc::core::{run, ChainDriver, ChainOptions, ChainRun, Recording};
use argmax_mcmc::proposals::{AdaptiveGaussian, Gaussian};
use argmax_mcmc::report::Reporter;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[cfg(test)]
mod tests {
    use super::*;

    const MEAN: [f64; 2] = [1.0, -1.0];
    const STD: [f64; 2] = [2.0, 1.0];
    const SEED: u64 = 42;

    fn log_density(x: &Vec<f64>) -> f64 {
        x.iter()
            .zip(MEAN.iter().zip(STD))
            .map(|(v, (m, s))| -0.5 * ((v - m) / s).powi(2))
            .sum()
    }

    fn density(x: &Vec<f64>) -> f64 {
        log_density(x).exp()
    }

    fn moments(run: &ChainRun<Vec<f64>>, dim: usize) -> (f64, f64) {
        let n = run.len() as f64;
        let mean = run.chain.iter().map(|node| node.state[dim]).sum::<f64>() / n;
        let var = run
            .chain
            .iter()
            .map(|node| (node.state[dim] - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        (mean, var)
    }

    fn assert_matches_target(run: &ChainRun<Vec<f64>>) {
        for dim in 0..2 {
            let (mean, var) = moments(run, dim);
            assert_abs_diff_eq!(mean, MEAN[dim], epsilon = 0.25);
            let target_var = STD[dim] * STD[dim];
            assert!(
                (var - target_var).abs() < 0.25 * target_var,
                "dim {dim}: variance {var}, expected {target_var}"
            );
        }
    }

    #[test]
    fn log_ratio_sampler_matches_target_moments() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let options = ChainOptions::new(60_000)
            .burn_in(1_000)
            .recording(Recording::Dense)
            .acceptance(AcceptanceRule::LogRatio);
        let result = run(
            log_density,
            Gaussian::new(1.5).unwrap(),
            vec![6.0, 4.0],
            options,
            &mut rng,
        )
        .unwrap();
        assert_matches_target(&result);
        let ratio = result.accepted_ratio();
        assert!(ratio > 0.2 && ratio < 0.9, "accepted ratio {ratio}");
    }

    #[test]
    fn plain_ratio_sampler_matches_target_moments() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let options = ChainOptions::new(60_000)
            .burn_in(1_000)
            .recording(Recording::Dense);
        let result = run(
            density,
            Gaussian::new(1.5).unwrap(),
            vec![1.0, -1.0],
            options,
            &mut rng,
        )
        .unwrap();
        assert_matches_target(&result);
    }

    #[test]
    fn burn_in_drops_exactly_the_first_acceptances() {
        let sample = |burn_in| {
            let mut rng = SmallRng::seed_from_u64(SEED);
            run(
                log_density,
                Gaussian::new(1.0).unwrap(),
                vec![0.0, 0.0],
                ChainOptions::new(2_000)
                    .burn_in(burn_in)
                    .acceptance(AcceptanceRule::LogRatio),
                &mut rng,
            )
            .unwrap()
        };
        let full = sample(0);
        let burnt = sample(25);
        assert_eq!(burnt.chain.as_slice(), &full.chain[25..]);
        assert_eq!(burnt.stats.accepted, full.stats.accepted);
    }

    #[test]
    fn adaptive_step_size_follows_outcomes() {
        struct Outcomes(Vec<bool>);
        impl Reporter for Outcomes {
            fn on_step(&mut self, _step: usize, accepted: bool) {
                self.0.push(accepted);
            }
        }

        let init_step_size = 0.8;
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut driver = ChainDriver::new(
            log_density,
            AdaptiveGaussian::new(init_step_size, 0.5).unwrap(),
            ChainOptions::new(2_000).acceptance(AcceptanceRule::LogRatio),
        )
        .unwrap();
        let mut outcomes = Outcomes(Vec::new());
        let result = driver.run(vec![5.0, 5.0], &mut rng, &mut outcomes).unwrap();

        let sizes = &result.step_sizes;
        assert_eq!(sizes.len(), outcomes.0.len() + 1);
        assert_eq!(sizes[0], init_step_size);
        for (step, &accepted) in outcomes.0.iter().enumerate() {
            if accepted {
                assert_eq!(sizes[step + 1], init_step_size);
            } else {
                assert_ne!(sizes[step + 1], sizes[step], "step {step}");
            }
        }
        assert!(outcomes.0.iter().any(|&a| a) && outcomes.0.iter().any(|&a| !a));
    }

    #[test]
    fn adaptive_run_restarts_from_initial_step_size() {
        let mut driver = ChainDriver::new(
            log_density,
            AdaptiveGaussian::new(0.3, 1.0).unwrap(),
            ChainOptions::new(100).acceptance(AcceptanceRule::LogRatio),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let first = driver
            .run(vec![0.0, 0.0], &mut rng, &mut argmax_mcmc::report::NullReporter)
            .unwrap();
        let second = driver
            .run(vec![0.0, 0.0], &mut rng, &mut argmax_mcmc::report::NullReporter)
            .unwrap();
        assert_eq!(first.step_sizes[0], 0.3);
        assert_eq!(second.step_sizes[0], 0.3);
    }

    #[test]
    fn same_seed_same_chain() {
        let sample = || {
            let mut rng = SmallRng::seed_from_u64(SEED);
            run(
                log_density,
                AdaptiveGaussian::new(1.0, 0.5).unwrap(),
                vec![0.0, 0.0],
                ChainOptions::new(1_000)
                    .recording(Recording::Dense)
                    .acceptance(AcceptanceRule::LogRatio),
                &mut rng,
            )
            .unwrap()
        };
        let (a, b) = (sample(), sample());
        assert_eq!(a.chain, b.chain);
        assert_eq!(a.step_sizes, b.step_sizes);
    }
}
