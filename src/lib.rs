//! # Mini SMC
//!
//! A compact Rust library for **Sequential Monte Carlo (SMC)** parameter
//! inference with likelihood tempering: a particle population is reweighted,
//! resampled and jittered while an artificial temperature climbs from 0 to
//! 1, ending with particles distributed according to the posterior of a
//! user-supplied model and its data — plus an estimate of the log marginal
//! likelihood along the way.
//!
//! To fit a model you provide:
//! - an ordered list of parameter declarations ([`model::ParamSpec`]), and
//! - a pure log-likelihood function, via the [`model::Model`] trait.
//!
//! The annealing loop itself ([`core`]) is generic: any kernel implementing
//! the five [`core::SmcKernel`] callbacks can be driven by it, and
//! [`temper::TemperedSmc`] is the likelihood-tempering kernel this crate
//! ships, built on systematic resampling ([`resample`]) and
//! Metropolis random-walk rejuvenation ([`jitter`]).
//!
//! ## Example: recovering a Gaussian's parameters
//!
//! ```rust
//! use mini_smc::model::GaussianModel;
//! use mini_smc::temper::TemperedSmc;
//!
//! let observations: Vec<Vec<f64>> = [4.6, 5.6, 4.9, 5.8, 5.1, 4.3, 5.5, 5.0]
//!     .iter()
//!     .map(|&x| vec![x])
//!     .collect();
//! let model = GaussianModel::new((0.0, 10.0), (0.0, 5.0));
//!
//! let mut smc = TemperedSmc::new(model, observations, 200, 50)
//!     .unwrap()
//!     .set_seed(42);
//! let output = smc.run();
//!
//! let mean = output.posterior_mean();
//! assert!((mean[0] - 5.1).abs() < 1.0, "posterior mean of the location");
//! assert!(output.log_marginal_likelihood.is_finite());
//! ```
//!
//! ## Example: a model of your own
//!
//! ```rust
//! use mini_smc::model::{Model, ParamSpec, LOG_IMPOSSIBLE};
//! use mini_smc::temper::TemperedSmc;
//!
//! /// Exponential waiting times with an unknown rate.
//! struct Exponential {
//!     params: Vec<ParamSpec>,
//! }
//!
//! impl Model for Exponential {
//!     fn params(&self) -> &[ParamSpec] {
//!         &self.params
//!     }
//!
//!     fn log_likelihood(&self, theta: &[f64], observation: &[f64]) -> f64 {
//!         let rate = theta[0];
//!         if rate <= 0.0 {
//!             return LOG_IMPOSSIBLE;
//!         }
//!         rate.ln() - rate * observation[0]
//!     }
//! }
//!
//! let model = Exponential {
//!     params: vec![ParamSpec::new("rate", 0.0, 10.0)],
//! };
//! let observations = vec![vec![0.4], vec![1.1], vec![0.7], vec![0.2]];
//! let mut smc = TemperedSmc::new(model, observations, 100, 25)
//!     .unwrap()
//!     .set_seed(42);
//! let output = smc.run();
//! assert_eq!(output.parameter("rate").unwrap().len(), 100);
//! ```
//!
//! ## Features
//! - **Reproducible runs**: every random draw comes from a seedable RNG
//!   (`set_seed`), including resampling offsets and jitter proposals.
//! - **Parallel weighting** of particles via `rayon`.
//! - **Progress reporting** (temperature, effective sample size) via
//!   `indicatif` with [`temper::TemperedSmc::run_progress`].
//! - **Ready-made models** for demos and tests: linear regression, a
//!   Gaussian, and the circle-area indicator model.

pub mod core;
pub mod jitter;
pub mod logspace;
pub mod model;
pub mod population;
pub mod resample;
pub mod stats;
pub mod temper;
