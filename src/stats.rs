//! Summary statistics for weighted particle populations.

use ndarray::prelude::*;

use crate::logspace::log_sum_exp;

/**
Effective sample size of a log-weight array: `1 / sum(w_i^2)` over the
normalized weights.

Equal weights give `N`; a population whose mass sits on one particle gives 1.
An all-degenerate array (every weight zero) gives 0.

# Examples

```rust
use mini_smc::stats::ess;

assert!((ess(&[0.0; 10]) - 10.0).abs() < 1e-9);
assert!(ess(&[0.0, -1e9, -1e9]) < 1.0 + 1e-9);
```
*/
pub fn ess(log_weights: &[f64]) -> f64 {
    let total = log_sum_exp(log_weights);
    if total == f64::NEG_INFINITY {
        return 0.0;
    }
    let sum_sq: f64 = log_weights
        .iter()
        .map(|&lw| ((lw - total) * 2.0).exp())
        .sum();
    1.0 / sum_sq
}

/// Per-dimension mean of an `(n, d)` sample array.
pub fn mean(samples: &ArrayView2<f64>) -> Array1<f64> {
    samples
        .mean_axis(Axis(0))
        .expect("Expected a non-empty sample array.")
}

/// Per-dimension unbiased sample variance of an `(n, d)` sample array.
pub fn variance(samples: &ArrayView2<f64>) -> Array1<f64> {
    let n = samples.nrows() as f64;
    let mean = mean(samples);
    let centered = samples.to_owned()
        - mean
            .broadcast(samples.dim())
            .expect("Expected broadcasting the mean to succeed.");
    centered.pow2().sum_axis(Axis(0)) / (n - 1.0)
}
