/*!
Systematic (low-variance) resampling.

Converts a log-weight array into a list of parent indices with a single
stratified sweep: one uniform offset in `[0, 1/N)` places `N` evenly spaced
points over the cumulative weight distribution, and each point selects the
particle whose cumulative mass it falls into. Compared to `N` independent
multinomial draws this minimizes resampling variance, and the output indices
are non-decreasing by construction.

# Examples

```rust
use mini_smc::resample::systematic;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let mut rng = SmallRng::seed_from_u64(42);
// Equal weights: every particle survives exactly once.
let parents = systematic(&[0.0; 5], &mut rng);
assert_eq!(parents, vec![0, 1, 2, 3, 4]);
```
*/

use rand::Rng;

use crate::logspace::log_sum_exp;

/// Draws `N` parent indices in `[0, N)` proportional to the given
/// (unnormalized) log-weights.
///
/// The cursor is clamped at `N - 1` so a cumulative sum that lands slightly
/// below 1.0 cannot push an index out of range.
pub fn systematic<R: Rng>(log_weights: &[f64], rng: &mut R) -> Vec<usize> {
    let n = log_weights.len();
    let total = log_sum_exp(log_weights);

    let mut cdf = Vec::with_capacity(n);
    let mut acc = 0.0;
    for &lw in log_weights {
        acc += (lw - total).exp();
        cdf.push(acc);
    }

    let u: f64 = rng.gen::<f64>() / n as f64;
    let mut parents = Vec::with_capacity(n);
    let mut cursor = 0usize;
    for k in 0..n {
        let point = u + k as f64 / n as f64;
        while cursor < n - 1 && point > cdf[cursor] {
            cursor += 1;
        }
        parents.push(cursor);
    }
    parents
}
