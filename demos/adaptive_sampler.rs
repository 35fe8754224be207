//! Samples a 2D Gaussian with the step-size adaptive walk and reports the
//! sample mean and how the step size evolved.

use argmax_mcmc::acceptance::AcceptanceRule;
use argmax_mcmc::core::{ChainDriver, ChainOptions, Recording};
use argmax_mcmc::proposals::AdaptiveGaussian;
use argmax_mcmc::report::NullReporter;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const SAMPLE_SIZE: usize = 50_000;
    const BURNIN: usize = 1_000;

    // Unnormalized log-density of N([2, -1], diag(1, 4)).
    let log_density = |x: &Vec<f64>| -0.5 * ((x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2) / 4.0);

    let options = ChainOptions::new(SAMPLE_SIZE)
        .burn_in(BURNIN)
        .recording(Recording::Dense)
        .acceptance(AcceptanceRule::LogRatio);
    let mut driver = ChainDriver::new(log_density, AdaptiveGaussian::new(1.0, 0.5)?, options)?;

    let mut rng = SmallRng::seed_from_u64(42);
    let run = driver.run(vec![10.0, 10.0], &mut rng, &mut NullReporter)?;

    let n = run.len() as f64;
    let mean: Vec<f64> = (0..2)
        .map(|d| run.chain.iter().map(|node| node.state[d]).sum::<f64>() / n)
        .collect();
    println!("Generated {} samples", run.len());
    println!("Mean after burn-in: ({:.2}, {:.2})", mean[0], mean[1]);

    let max_step = run.step_sizes.iter().copied().fold(f64::MIN, f64::max);
    println!(
        "Step size: final {:.3}, largest {:.3}",
        run.final_step_size().unwrap_or(f64::NAN),
        max_step
    );
    println!("Best sample: {:?}", run.best());
    Ok(())
}
