//! Log-domain arithmetic helpers.
//!
//! Every weight and likelihood computation in this crate routes through these
//! functions so that products and ratios of very small probabilities stay
//! representable. All helpers are generic over the floating-point precision
//! via [`num_traits::Float`].

use num_traits::Float;

/// Division in the log domain: `log(a / b) = log a - log b`.
pub fn log_ratio<T: Float>(log_a: T, log_b: T) -> T {
    log_a - log_b
}

/// Exponentiation in the log domain: `log(a^b) = b * log a`.
///
/// The exponent `b` is a plain real number, not itself log-transformed.
pub fn log_pow<T: Float>(log_a: T, b: T) -> T {
    log_a * b
}

/**
Computes `log(sum(exp(v_i)))` without leaving the log domain.

Subtracts the maximum before exponentiating so the sum cannot overflow.
Returns negative infinity when every element is negative infinity (the log of
an empty or all-zero sum); individual negative-infinity terms contribute
nothing to the sum and are skipped rather than pushed through `exp`.

# Examples

```rust
use mini_smc::logspace::log_sum_exp;

let v = [0.0_f64, 0.0, 0.0, 0.0];
let total = log_sum_exp(&v);
assert!((total - 4.0_f64.ln()).abs() < 1e-12);
```
*/
pub fn log_sum_exp<T: Float>(values: &[T]) -> T {
    let max = values
        .iter()
        .fold(T::neg_infinity(), |acc, &v| acc.max(v));
    if max == T::neg_infinity() {
        return T::neg_infinity();
    }
    let mut sum = T::zero();
    for &v in values {
        if v > T::neg_infinity() {
            sum = sum + (v - max).exp();
        }
    }
    max + sum.ln()
}
