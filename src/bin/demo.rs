//! A small SMC demo: fit a linear regression to synthetic data with
//! likelihood tempering, then print the posterior summary.

use mini_smc::model::LinearModel;
use mini_smc::stats::variance;
use mini_smc::temper::TemperedSmc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::error::Error;

/// Main entry point: generates noisy points along `y = 2x + 1`, runs the
/// tempered SMC sampler with a progress bar, and prints posterior means and
/// the log marginal likelihood estimate.
fn main() -> Result<(), Box<dyn Error>> {
    const N_POINTS: usize = 50;
    const N_PARTICLES: usize = 200;
    const N_STEPS: usize = 200;
    const SEED: u64 = 42;

    // Synthetic data: y = 2x + 1 + Normal(0, 0.1), x in [0, 10].
    let mut rng = SmallRng::seed_from_u64(SEED);
    let observations: Vec<Vec<f64>> = (0..N_POINTS)
        .map(|i| {
            let x = 10.0 * i as f64 / (N_POINTS - 1) as f64;
            let noise: f64 = rng.sample::<f64, _>(StandardNormal) * 0.1;
            vec![x, 2.0 * x + 1.0 + noise]
        })
        .collect();
    println!("Fitting {} synthetic points of y = 2x + 1", observations.len());

    let model = LinearModel::new((-10.0, 10.0), (-10.0, 10.0), (0.0, 5.0));
    let mut smc = TemperedSmc::new(model, observations, N_PARTICLES, N_STEPS)?.set_seed(SEED);
    let output = smc.run_progress();

    let mean = output.posterior_mean();
    let var = variance(&output.particles());
    println!("Log marginal likelihood: {:.3}", output.log_marginal_likelihood);
    for (i, name) in output.names().iter().enumerate() {
        println!("{name:>10}: {:+.4} (sd {:.4})", mean[i], var[i].sqrt());
    }

    Ok(())
}
