/*!
The generic SMC loop.

The engine drives any annealing-style Sequential Monte Carlo variant through
five callbacks; it knows nothing about tempering, models or how particles are
represented. Each iteration weights the population, accumulates the
population's contribution to the log marginal likelihood, and asks the
schedule whether to continue; if so it resamples and rejuvenates before the
next pass. Weighting always completes for the whole population before the
resampling decision reads the weights.

See [`crate::temper::TemperedSmc`] for the likelihood-tempering kernel this
crate ships.
*/

use indicatif::ProgressBar;

/// The five callbacks an annealing-style SMC kernel supplies.
pub trait SmcKernel {
    /// Recomputes the incremental importance weight of every particle.
    fn weight(&mut self);

    /// The population's current contribution to the log marginal
    /// likelihood estimate.
    fn log_mean_likelihood(&self) -> f64;

    /// Replaces the population by drawing parents proportional to weight.
    fn resample(&mut self);

    /// Restores particle diversity lost to resampling.
    fn rejuvenate(&mut self);

    /// Advances the annealing schedule. Returns `false` once the schedule
    /// is exhausted and the run should stop.
    fn step(&mut self) -> bool;
}

/// Runs the kernel to completion and returns the accumulated log marginal
/// likelihood estimate.
pub fn run_smc<K: SmcKernel>(kernel: &mut K) -> f64 {
    let mut log_marginal = 0.0;
    loop {
        kernel.weight();
        log_marginal += kernel.log_mean_likelihood();
        if !kernel.step() {
            return log_marginal;
        }
        kernel.resample();
        kernel.rejuvenate();
    }
}

/// Like [`run_smc`], updating a caller-configured progress bar once per
/// iteration. `message` renders the kernel's current state (temperature,
/// effective sample size, ...) into the bar's message slot.
pub fn run_smc_with_progress<K, F>(kernel: &mut K, pb: &ProgressBar, message: F) -> f64
where
    K: SmcKernel,
    F: Fn(&K) -> String,
{
    let mut log_marginal = 0.0;
    loop {
        kernel.weight();
        log_marginal += kernel.log_mean_likelihood();
        pb.set_message(message(kernel));
        pb.inc(1);
        if !kernel.step() {
            pb.finish_with_message(format!("log ml = {log_marginal:.4}"));
            return log_marginal;
        }
        kernel.resample();
        kernel.rejuvenate();
    }
}
