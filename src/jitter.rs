/*!
Metropolis rejuvenation kernel.

After resampling, many particles are copies of the same parent. One or more
random-walk sweeps at different scales restore diversity without changing the
distribution the population targets: each particle independently receives a
Gaussian perturbation of its whole parameter vector, which an externally
supplied Metropolis predicate accepts or rejects.

The kernel knows nothing about likelihoods or temperatures; the acceptance
predicate carries all of that, which keeps detailed balance the caller's
contract.
*/

use rand::Rng;
use rand_distr::StandardNormal;

use crate::model::ParamSpec;
use crate::population::Population;

/// Per-dimension base step sizes derived from the declared ranges:
/// `|upper - lower| / D / 3`, roughly three standard deviations of
/// inter-particle spacing along each dimension.
pub fn step_sizes(specs: &[ParamSpec]) -> Vec<f64> {
    let d = specs.len() as f64;
    specs
        .iter()
        .map(|spec| (spec.upper - spec.lower).abs() / d / 3.0)
        .collect()
}

/**
Runs one rejuvenation sweep over the whole population.

For every scale in `scales` (in order) and every particle independently, a
joint proposal moves all dimensions at once:

```text
proposed_d = current_d + gaussian() * scale * step_d / N^(1/D)
```

The `N^(1/D)` divisor shrinks proposals as particle density grows with the
population size. `accept` receives the RNG plus the old and proposed
parameter vectors; on acceptance the particle's dimensions are overwritten
together, on rejection the particle is left untouched. Particles carry no
inter-particle dependency during the sweep, so update order only matters for
reproducing the random draws.
*/
pub fn rejuvenate<R, F>(
    population: &mut Population,
    specs: &[ParamSpec],
    scales: &[f64],
    rng: &mut R,
    mut accept: F,
) where
    R: Rng,
    F: FnMut(&mut R, &[f64], &[f64]) -> bool,
{
    let steps = step_sizes(specs);
    let n = population.n_particles();
    let density = (n as f64).powf(1.0 / specs.len() as f64);

    for &scale in scales {
        for i in 0..n {
            let current = population.particle(i);
            let proposed: Vec<f64> = current
                .iter()
                .zip(&steps)
                .map(|(&x, &step)| {
                    let eps: f64 = rng.sample(StandardNormal);
                    x + eps * scale * step / density
                })
                .collect();
            if accept(rng, &current, &proposed) {
                population.set_particle(i, &proposed);
            }
        }
    }
}
