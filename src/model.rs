/*!
Defines the model contract consumed by the sampler — ordered parameter
specifications plus a log-likelihood function — along with a few ready-made
models (linear regression, Gaussian, circle-area) used by the demos and the
end-to-end tests.

A model is an immutable value: the engine is written generically against the
[`Model`] trait, so declaring a new model means implementing two methods.

# Examples

```rust
use mini_smc::model::{Model, ParamSpec, LOG_IMPOSSIBLE};

/// An exponential-rate model for positive observations.
struct Exponential {
    params: Vec<ParamSpec>,
}

impl Model for Exponential {
    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn log_likelihood(&self, theta: &[f64], observation: &[f64]) -> f64 {
        let rate = theta[0];
        if rate <= 0.0 {
            return LOG_IMPOSSIBLE;
        }
        rate.ln() - rate * observation[0]
    }
}

let model = Exponential {
    params: vec![ParamSpec::new("rate", 0.0, 10.0)],
};
assert_eq!(model.params().len(), 1);
```
*/

use std::error::Error;
use std::f64::consts::PI;

/// Sentinel log-likelihood for parameter regions with no posterior mass.
///
/// Finite (the most negative representable value) so that tempering — a
/// product with the temperature — stays NaN-free even at temperature 0.
/// Summing it over many observations overflows to negative infinity, which
/// the tempering driver absorbs.
pub const LOG_IMPOSSIBLE: f64 = f64::MIN;

/// One parameter declaration: a name and an inclusive value range.
///
/// The range seeds the initial particle spread and sets the jitter step size
/// for this dimension; jittered values are not clamped to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }
}

/// A statistical model: an ordered, fixed list of parameter specifications
/// and a pure log-likelihood function.
///
/// `theta` carries one value per parameter, in declared order. `observation`
/// is one row of the data; models define its layout. When the sampler runs
/// without observations it evaluates the likelihood once with an empty row.
///
/// Return a finite log-likelihood, or [`LOG_IMPOSSIBLE`] for ill-defined
/// parameter combinations (e.g. a non-positive scale).
pub trait Model {
    fn params(&self) -> &[ParamSpec];

    fn log_likelihood(&self, theta: &[f64], observation: &[f64]) -> f64;
}

/// Checks a model's parameter declarations before any run starts.
///
/// Fails on an empty parameter list or a non-finite bound; configuration
/// errors are fatal and are never coerced.
pub fn validate_params(params: &[ParamSpec]) -> Result<(), Box<dyn Error>> {
    if params.is_empty() {
        return Err("Expected at least one parameter declaration.".into());
    }
    for p in params {
        if !p.lower.is_finite() || !p.upper.is_finite() {
            return Err(format!(
                "Parameter {:?} has a non-finite bound ({}, {}).",
                p.name, p.lower, p.upper
            )
            .into());
        }
    }
    Ok(())
}

fn gaussian_log_density(x: f64, mean: f64, sigma: f64) -> f64 {
    let z = (x - mean) / sigma;
    -0.5 * z * z - sigma.ln() - 0.5 * (2.0 * PI).ln()
}

/**
Linear regression `y = slope * x + intercept + Normal(0, sigma)`.

Parameters, in order: `slope`, `intercept`, `sigma`. Each observation row is
`[x, y]`. Non-positive `sigma` values are impossible.

# Examples

```rust
use mini_smc::model::{LinearModel, Model};

let model = LinearModel::new((-10.0, 10.0), (-10.0, 10.0), (0.0, 5.0));
let ll = model.log_likelihood(&[2.0, 1.0, 0.5], &[1.0, 3.1]);
assert!(ll.is_finite());
```
*/
#[derive(Debug, Clone)]
pub struct LinearModel {
    params: Vec<ParamSpec>,
}

impl LinearModel {
    pub fn new(slope: (f64, f64), intercept: (f64, f64), sigma: (f64, f64)) -> Self {
        Self {
            params: vec![
                ParamSpec::new("slope", slope.0, slope.1),
                ParamSpec::new("intercept", intercept.0, intercept.1),
                ParamSpec::new("sigma", sigma.0, sigma.1),
            ],
        }
    }
}

impl Model for LinearModel {
    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn log_likelihood(&self, theta: &[f64], observation: &[f64]) -> f64 {
        let (slope, intercept, sigma) = (theta[0], theta[1], theta[2]);
        if sigma <= 0.0 {
            return LOG_IMPOSSIBLE;
        }
        let (x, y) = (observation[0], observation[1]);
        gaussian_log_density(y, slope * x + intercept, sigma)
    }
}

/// A Gaussian with unknown location and scale.
///
/// Parameters, in order: `mean`, `sigma`. Each observation row is `[x]`.
/// Non-positive `sigma` values are impossible.
#[derive(Debug, Clone)]
pub struct GaussianModel {
    params: Vec<ParamSpec>,
}

impl GaussianModel {
    pub fn new(mean: (f64, f64), sigma: (f64, f64)) -> Self {
        Self {
            params: vec![
                ParamSpec::new("mean", mean.0, mean.1),
                ParamSpec::new("sigma", sigma.0, sigma.1),
            ],
        }
    }
}

impl Model for GaussianModel {
    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn log_likelihood(&self, theta: &[f64], observation: &[f64]) -> f64 {
        let (mean, sigma) = (theta[0], theta[1]);
        if sigma <= 0.0 {
            return LOG_IMPOSSIBLE;
        }
        gaussian_log_density(observation[0], mean, sigma)
    }
}

/// The circle-area model: an indicator likelihood over the unit disc.
///
/// Parameters `x`, `y` range over `[-1, 1]`; the likelihood is 1 inside the
/// unit circle and impossible outside, and the model takes no observations.
/// The marginal likelihood of this model is the probability that a point of
/// the square lies in the disc, pi/4, so `4 * exp(log_ml)` estimates pi.
///
/// Hard indicator boundaries interact oddly with incremental tempering
/// weights, and the estimate has been observed to drift with the number of
/// annealing steps. The `circle_test` integration test records the
/// behavior.
#[derive(Debug, Clone)]
pub struct CircleModel {
    params: Vec<ParamSpec>,
}

impl CircleModel {
    pub fn new() -> Self {
        Self {
            params: vec![
                ParamSpec::new("x", -1.0, 1.0),
                ParamSpec::new("y", -1.0, 1.0),
            ],
        }
    }
}

impl Default for CircleModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for CircleModel {
    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn log_likelihood(&self, theta: &[f64], _observation: &[f64]) -> f64 {
        let (x, y) = (theta[0], theta[1]);
        if x * x + y * y <= 1.0 {
            0.0
        } else {
            LOG_IMPOSSIBLE
        }
    }
}
