//! End-to-end check: likelihood-tempered SMC recovers the location and
//! scale of a Gaussian from 200 samples.

use mini_smc::model::GaussianModel;
use mini_smc::temper::TemperedSmc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// 200 draws, standardized so the sample carries exactly mean 5 and
/// standard deviation 2. The assertions then measure sampler error rather
/// than sampling luck.
fn synthetic_gaussian(seed: u64) -> Vec<Vec<f64>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let raw: Vec<f64> = (0..200).map(|_| rng.sample(StandardNormal)).collect();
    let n = raw.len() as f64;
    let mean = raw.iter().sum::<f64>() / n;
    let sd = (raw.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt();
    raw.iter()
        .map(|x| vec![5.0 + 2.0 * (x - mean) / sd])
        .collect()
}

#[test]
fn recovers_mean_and_scale() {
    const SEED: u64 = 42;

    let observations = synthetic_gaussian(SEED);
    let model = GaussianModel::new((0.0, 10.0), (0.0, 5.0));
    let mut smc = TemperedSmc::new(model, observations, 200, 200)
        .unwrap()
        .set_seed(SEED);
    let output = smc.run();

    assert!(
        output.log_marginal_likelihood.is_finite(),
        "Expected a finite log marginal likelihood, got {}.",
        output.log_marginal_likelihood
    );

    let mean = output.posterior_mean();
    let (location, scale) = (mean[0], mean[1]);
    assert!(
        (location - 5.0).abs() < 0.3,
        "Posterior mean too far from 5.0: {location}."
    );
    assert!(
        (scale - 2.0).abs() < 0.3,
        "Posterior scale too far from 2.0: {scale}."
    );
}
