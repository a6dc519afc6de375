//! End-to-end check: likelihood-tempered SMC recovers the coefficients of a
//! linear model from noisy synthetic data.

use mini_smc::model::LinearModel;
use mini_smc::temper::TemperedSmc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// `y = 2x + 1 + Normal(0, 0.1)` for 50 points with x in [0, 10].
fn synthetic_line(seed: u64) -> Vec<Vec<f64>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..50)
        .map(|i| {
            let x = 10.0 * i as f64 / 49.0;
            let noise: f64 = rng.sample::<f64, _>(StandardNormal) * 0.1;
            vec![x, 2.0 * x + 1.0 + noise]
        })
        .collect()
}

#[test]
fn recovers_slope_and_intercept() {
    const SEED: u64 = 42;

    let observations = synthetic_line(SEED);
    let model = LinearModel::new((-10.0, 10.0), (-10.0, 10.0), (0.0, 5.0));
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
    let (slope, intercept, sigma) = (mean[0], mean[1], mean[2]);
    assert!(
        (slope - 2.0).abs() < 0.2,
        "Posterior slope too far from 2.0: {slope}."
    );
    assert!(
        (intercept - 1.0).abs() < 0.2,
        "Posterior intercept too far from 1.0: {intercept}."
    );
    assert!(
        sigma > 0.0 && sigma < 1.0,
        "Posterior noise scale should sit near 0.1, got {sigma}."
    );
}
