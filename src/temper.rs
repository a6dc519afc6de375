/*!
# Likelihood-tempered SMC

The [`TemperedSmc`] sampler anneals a particle population from a diffuse
initial spread to the posterior implied by a [`Model`] and its observations.
An artificial temperature climbs from 0 to 1 over a fixed number of equal
rungs; at each rung every particle is reweighted by the likelihood mass newly
turned on since the previous rung, the population is resampled systematically
and rejuvenated with Metropolis random-walk jitter. The accumulated mean
weights form an estimate of the log marginal likelihood.

## Example Usage

```rust
use mini_smc::model::GaussianModel;
use mini_smc::temper::TemperedSmc;

// Ten observations of a Gaussian with unknown mean and scale.
let observations: Vec<Vec<f64>> = [4.1, 5.3, 4.8, 5.9, 5.2, 4.5, 5.6, 4.9, 5.1, 5.4]
    .iter()
    .map(|&x| vec![x])
    .collect();
let model = GaussianModel::new((0.0, 10.0), (0.0, 5.0));

let mut smc = TemperedSmc::new(model, observations, 100, 20)
    .unwrap()
    .set_seed(42);
let output = smc.run();

assert!(output.log_marginal_likelihood.is_finite());
assert_eq!(output.parameter("mean").unwrap().len(), 100);
```
*/

use std::collections::HashMap;
use std::error::Error;

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::prelude::*;
use rand::prelude::*;
use rayon::prelude::*;

use crate::core::{run_smc, run_smc_with_progress, SmcKernel};
use crate::jitter;
use crate::logspace::{log_pow, log_ratio, log_sum_exp};
use crate::model::{validate_params, Model};
use crate::population::Population;
use crate::resample::systematic;
use crate::stats::ess;

/// Log-likelihood of the whole data set at `theta`: the sum over
/// observation rows, or a single no-observation evaluation when the data set
/// is empty. Overflowing accumulation saturates at negative infinity.
fn summed_log_likelihood<M: Model>(model: &M, observations: &[Vec<f64>], theta: &[f64]) -> f64 {
    if observations.is_empty() {
        return model.log_likelihood(theta, &[]);
    }
    observations
        .iter()
        .map(|obs| model.log_likelihood(theta, obs))
        .sum()
}

/// Raises a summed log-likelihood to the temperature exponent. An
/// overflowed (negative-infinite) total stays negative infinity at every
/// temperature rather than passing through `log_pow`.
fn tempered(total: f64, temperature: f64) -> f64 {
    if total == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    log_pow(total, temperature)
}

/**
The likelihood-tempering SMC sampler.

Owns the particle [`Population`], the temperature schedule and a seedable
RNG, and implements the [`SmcKernel`] callbacks for the generic engine.

# Examples

```rust
use mini_smc::model::CircleModel;
use mini_smc::temper::TemperedSmc;

// The circle-area model runs without observations.
let mut smc = TemperedSmc::new(CircleModel::new(), vec![], 100, 10)
    .unwrap()
    .set_seed(42);
let output = smc.run();
assert!(output.log_marginal_likelihood <= 0.0);
```
*/
pub struct TemperedSmc<M: Model> {
    /// The model being fitted.
    pub model: M,
    /// The particle population, readable between runs.
    pub population: Population,
    /// The sampler's random seed.
    pub seed: u64,
    observations: Vec<Vec<f64>>,
    jitter_scales: Vec<f64>,
    n_steps: usize,
    rung: usize,
    temperature: f64,
    previous_temperature: f64,
    rng: SmallRng,
}

impl<M: Model> TemperedSmc<M> {
    /**
    Creates a sampler for `model` over `observations`, with `n_particles`
    particles and `n_steps` equal temperature increments.

    The particle population starts as a deterministic linear spread over the
    declared parameter ranges. Jitter scales default to `[0.01, 0.35, 1.0]`.

    # Errors

    Fails fast, before any run, on an empty parameter list, a non-finite
    parameter bound, zero particles or zero steps.
    */
    pub fn new(
        model: M,
        observations: Vec<Vec<f64>>,
        n_particles: usize,
        n_steps: usize,
    ) -> Result<Self, Box<dyn Error>> {
        validate_params(model.params())?;
        if n_particles == 0 {
            return Err("Expected at least one particle.".into());
        }
        if n_steps == 0 {
            return Err("Expected at least one temperature step.".into());
        }
        let population = Population::new(model.params(), n_particles);
        let seed = thread_rng().gen::<u64>();
        Ok(Self {
            model,
            population,
            seed,
            observations,
            jitter_scales: vec![0.01, 0.35, 1.0],
            n_steps,
            rung: 1,
            temperature: rung_temperature(1, n_steps),
            previous_temperature: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// [`TemperedSmc::new`] with the stock configuration: 100 particles and
    /// 100 temperature steps.
    pub fn with_defaults(model: M, observations: Vec<Vec<f64>>) -> Result<Self, Box<dyn Error>> {
        Self::new(model, observations, 100, 100)
    }

    /// Replaces the default jitter scales. Scales are applied in order
    /// during every rejuvenation sweep.
    pub fn jitter_scales(mut self, scales: &[f64]) -> Self {
        self.jitter_scales = scales.to_vec();
        self
    }

    /// Sets a new seed so that runs are reproducible.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// The current annealing temperature in `[0, 1]`.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

/// Temperature of rung `k` out of `n_steps`: `k / n_steps`, capped at 1.
/// Computing each rung directly avoids the drift of repeatedly adding the
/// increment (ten additions of 0.1 land just below 1.0).
fn rung_temperature(rung: usize, n_steps: usize) -> f64 {
    if rung >= n_steps {
        1.0
    } else {
        rung as f64 / n_steps as f64
    }
}

impl<M: Model + Sync> TemperedSmc<M> {
    /// Runs the annealing schedule to completion and returns the log
    /// marginal likelihood estimate together with the final population.
    pub fn run(&mut self) -> SmcOutput {
        let log_ml = run_smc(self);
        self.output(log_ml)
    }

    /// Like [`TemperedSmc::run`], with an `indicatif` progress bar showing
    /// the temperature and the effective sample size per rung.
    pub fn run_progress(&mut self) -> SmcOutput {
        let pb = ProgressBar::new(self.n_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:8} {bar:40.white} ETA {eta:3} | {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_prefix("SMC");
        let log_ml = run_smc_with_progress(self, &pb, |smc| {
            format!(
                "temp {:.3} | ess {:.1}",
                smc.temperature,
                ess(&smc.population.log_weights)
            )
        });
        self.output(log_ml)
    }

    fn output(&self, log_marginal_likelihood: f64) -> SmcOutput {
        let (n, d) = (self.population.n_particles(), self.population.n_params());
        let mut particles = Array2::<f64>::zeros((n, d));
        for (j, dim) in self.population.values.iter().enumerate() {
            for (i, &v) in dim.iter().enumerate() {
                particles[[i, j]] = v;
            }
        }
        SmcOutput {
            log_marginal_likelihood,
            names: self.model.params().iter().map(|p| p.name.clone()).collect(),
            particles,
        }
    }
}

impl<M: Model + Sync> SmcKernel for TemperedSmc<M> {
    /// Incremental importance weights: the likelihood mass newly turned on
    /// between the previous temperature and the current one. Per-particle
    /// evaluations carry no random draws, so they run in parallel.
    fn weight(&mut self) {
        let (t, t_prev) = (self.temperature, self.previous_temperature);
        let weights: Vec<f64> = (0..self.population.n_particles())
            .into_par_iter()
            .map(|i| {
                let theta = self.population.particle(i);
                let total = summed_log_likelihood(&self.model, &self.observations, &theta);
                if total == f64::NEG_INFINITY {
                    // No likelihood mass at either temperature: zero weight,
                    // not the NaN a blind -inf minus -inf would produce.
                    return f64::NEG_INFINITY;
                }
                log_ratio(tempered(total, t), tempered(total, t_prev))
            })
            .collect();
        self.population.log_weights = weights;
    }

    fn log_mean_likelihood(&self) -> f64 {
        log_sum_exp(&self.population.log_weights)
            - (self.population.n_particles() as f64).ln()
    }

    fn resample(&mut self) {
        let parents = systematic(&self.population.log_weights, &mut self.rng);
        self.population.reindex(&parents);
    }

    /// Metropolis rejuvenation at the current temperature: a proposal is
    /// accepted iff `ln(u) < tempered(new) - tempered(old)`.
    fn rejuvenate(&mut self) {
        let t = self.temperature;
        let Self {
            model,
            observations,
            population,
            jitter_scales,
            rng,
            ..
        } = self;
        let model: &M = model;
        let observations: &[Vec<f64>] = observations;
        jitter::rejuvenate(
            population,
            model.params(),
            jitter_scales,
            rng,
            |rng, old, new| {
                let log_alpha = log_ratio(
                    tempered(summed_log_likelihood(model, observations, new), t),
                    tempered(summed_log_likelihood(model, observations, old), t),
                );
                rng.gen::<f64>().ln() < log_alpha
            },
        );
    }

    fn step(&mut self) -> bool {
        let more = self.temperature < 1.0;
        self.previous_temperature = self.temperature;
        self.rung = (self.rung + 1).min(self.n_steps);
        self.temperature = rung_temperature(self.rung, self.n_steps);
        more
    }
}

/// The result of a run: the log marginal likelihood estimate and the final
/// particle population, addressable by parameter name.
#[derive(Debug, Clone)]
pub struct SmcOutput {
    /// Estimated log normalizing constant of the data distribution.
    pub log_marginal_likelihood: f64,
    names: Vec<String>,
    particles: Array2<f64>,
}

impl SmcOutput {
    /// Parameter names, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The posterior sample as an `(n_particles, n_params)` array.
    pub fn particles(&self) -> ArrayView2<f64> {
        self.particles.view()
    }

    /// The posterior sample of one named parameter.
    pub fn parameter(&self, name: &str) -> Option<ArrayView1<f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.particles.column(idx))
    }

    /// Posterior mean per parameter, in declaration order.
    pub fn posterior_mean(&self) -> Array1<f64> {
        crate::stats::mean(&self.particles.view())
    }

    /// Consumes the output into a name-to-samples map.
    pub fn into_map(self) -> HashMap<String, Vec<f64>> {
        let particles = &self.particles;
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), particles.column(i).to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamSpec;
    use approx::assert_abs_diff_eq;

    /// A likelihood that is identically 1, so the marginal likelihood is
    /// exactly 1 whatever the particles do.
    struct FlatModel {
        params: Vec<ParamSpec>,
    }

    impl FlatModel {
        fn new() -> Self {
            Self {
                params: vec![ParamSpec::new("level", 0.0, 1.0)],
            }
        }
    }

    impl Model for FlatModel {
        fn params(&self) -> &[ParamSpec] {
            &self.params
        }

        fn log_likelihood(&self, _theta: &[f64], _observation: &[f64]) -> f64 {
            0.0
        }
    }

    /// Log-likelihood equal to the parameter itself; handy for checking the
    /// weighting arithmetic exactly.
    struct RampModel {
        params: Vec<ParamSpec>,
    }

    impl RampModel {
        fn new() -> Self {
            Self {
                params: vec![ParamSpec::new("level", 0.0, 1.0)],
            }
        }
    }

    impl Model for RampModel {
        fn params(&self) -> &[ParamSpec] {
            &self.params
        }

        fn log_likelihood(&self, theta: &[f64], _observation: &[f64]) -> f64 {
            theta[0]
        }
    }

    #[test]
    fn construction_validates_configuration() {
        assert!(TemperedSmc::new(FlatModel::new(), vec![], 0, 10).is_err());
        assert!(TemperedSmc::new(FlatModel::new(), vec![], 10, 0).is_err());
        let unbounded = FlatModel {
            params: vec![ParamSpec::new("level", 0.0, f64::INFINITY)],
        };
        assert!(TemperedSmc::new(unbounded, vec![], 10, 10).is_err());
        let empty = FlatModel { params: vec![] };
        assert!(TemperedSmc::new(empty, vec![], 10, 10).is_err());
    }

    #[test]
    fn default_configuration_runs() {
        let mut smc = TemperedSmc::with_defaults(FlatModel::new(), vec![])
            .unwrap()
            .jitter_scales(&[0.35])
            .set_seed(42);
        let output = smc.run();
        assert_eq!(output.particles().nrows(), 100);
        assert_abs_diff_eq!(output.log_marginal_likelihood, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn temperature_climbs_in_equal_rungs_and_clamps_at_one() {
        let mut smc = TemperedSmc::new(FlatModel::new(), vec![], 4, 4)
            .unwrap()
            .set_seed(42);
        assert_eq!(smc.temperature(), 0.25);
        assert_eq!(smc.previous_temperature, 0.0);

        assert!(smc.step());
        assert_eq!(smc.temperature(), 0.5);
        assert_eq!(smc.previous_temperature, 0.25);
        assert!(smc.step());
        assert!(smc.step());
        assert_eq!(smc.temperature(), 1.0);
        // The schedule is exhausted once the temperature hits 1.
        assert!(!smc.step());
        assert_eq!(smc.temperature(), 1.0);
        assert_eq!(smc.previous_temperature, 1.0);
    }

    #[test]
    fn ten_rungs_reach_one_exactly() {
        // Repeatedly adding 0.1 would stop just short of 1.0; the rung
        // schedule must not.
        let mut smc = TemperedSmc::new(FlatModel::new(), vec![], 4, 10)
            .unwrap()
            .set_seed(42);
        let mut rungs = 1;
        while smc.step() {
            rungs += 1;
        }
        assert_eq!(rungs, 10);
        assert_eq!(smc.temperature(), 1.0);
    }

    #[test]
    fn flat_likelihood_has_zero_log_marginal_likelihood() {
        let mut smc = TemperedSmc::new(FlatModel::new(), vec![], 64, 10)
            .unwrap()
            .set_seed(42);
        let output = smc.run();
        assert_abs_diff_eq!(output.log_marginal_likelihood, 0.0, epsilon = 1e-12);
        assert_eq!(output.parameter("level").unwrap().len(), 64);
        assert!(output.parameter("missing").is_none());
    }

    #[test]
    fn weighting_turns_on_the_incremental_likelihood_mass() {
        let mut smc = TemperedSmc::new(RampModel::new(), vec![], 4, 2)
            .unwrap()
            .set_seed(42);
        // First rung: temperature 0.5 against previous temperature 0.
        smc.weight();
        assert_eq!(smc.population.log_weights, vec![0.0, 0.125, 0.25, 0.375]);

        let expected = (0.0f64.exp() + 0.125f64.exp() + 0.25f64.exp() + 0.375f64.exp()).ln()
            - 4.0f64.ln();
        assert_abs_diff_eq!(smc.log_mean_likelihood(), expected, epsilon = 1e-12);
    }

    #[test]
    fn fixed_seed_reproduces_the_whole_run() {
        let run = |seed| {
            let observations = vec![vec![4.5], vec![5.5], vec![5.0]];
            let model = crate::model::GaussianModel::new((0.0, 10.0), (0.0, 5.0));
            let mut smc = TemperedSmc::new(model, observations, 32, 8)
                .unwrap()
                .set_seed(seed);
            let out = smc.run();
            (out.log_marginal_likelihood, out.particles.clone())
        };
        let (ml_a, particles_a) = run(42);
        let (ml_b, particles_b) = run(42);
        assert_eq!(ml_a, ml_b);
        assert_eq!(particles_a, particles_b);

        let (ml_c, _) = run(43);
        assert_ne!(ml_a, ml_c, "Different seeds should differ somewhere.");
    }

    #[test]
    fn output_map_carries_every_parameter() {
        let observations = vec![vec![5.0]];
        let model = crate::model::GaussianModel::new((0.0, 10.0), (0.0, 5.0));
        let mut smc = TemperedSmc::new(model, observations, 16, 4)
            .unwrap()
            .set_seed(42);
        let map = smc.run().into_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["mean"].len(), 16);
        assert_eq!(map["sigma"].len(), 16);
    }
}
