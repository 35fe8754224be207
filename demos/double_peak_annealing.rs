//! Simulated annealing on a cost with two wells of different depth, compared
//! for three cooling schedules.

use argmax_mcmc::annealing::minimize;
use argmax_mcmc::core::ChainOptions;
use argmax_mcmc::proposals::Gaussian;
use argmax_mcmc::report::NullReporter;
use argmax_mcmc::schedule::TemperatureSchedule;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;

/// Shallow well near `x = -1`, deep well near `x = 2`.
fn cost(x: &Vec<f64>) -> f64 {
    let shallow = -(-(x[0] + 1.0).powi(2) * 4.0).exp();
    let deep = -2.0 * (-(x[0] - 2.0).powi(2) * 2.0).exp();
    shallow + deep
}

fn main() -> Result<(), Box<dyn Error>> {
    let schedules = [
        ("geometric", TemperatureSchedule::Geometric { initial: 2.0, ratio: 0.999 }),
        ("linear", TemperatureSchedule::Linear { initial: 2.0, rate: 2e-4, floor: 1e-3 }),
        ("logarithmic", TemperatureSchedule::Logarithmic { scale: 1.0 }),
    ];

    for (name, schedule) in schedules {
        let mut rng = SmallRng::seed_from_u64(7);
        let found = minimize(
            cost,
            Gaussian::new(0.5)?,
            vec![-1.0],
            schedule,
            ChainOptions::new(10_000),
            &mut rng,
            &mut NullReporter,
        )?;
        let (lowest, lowest_cost) = found.lowest();
        println!(
            "{name:>12}: ended at x = {:.3} (cost {:.3}), lowest x = {:.3} (cost {:.3}), accepted {:.1}%",
            found.state[0],
            found.cost,
            lowest[0],
            lowest_cost,
            100.0 * found.run.accepted_ratio()
        );
    }
    Ok(())
}
