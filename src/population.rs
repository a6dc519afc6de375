//! The particle population: one value array per parameter dimension plus a
//! log-weight array, all of length `N` for the whole run.
//!
//! Particle `i` is the tuple of the i-th elements across the dimension
//! arrays. It is always copied, perturbed or discarded as a unit; no
//! operation mixes components from different source indices.

use crate::model::ParamSpec;

/// The shared mutable substrate of an SMC run.
///
/// Weighting writes only `log_weights`; resampling overwrites parameter
/// rows wholesale via [`Population::reindex`]; jitter updates one particle
/// at a time through [`Population::set_particle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Parameter values, one `Vec` of length `n_particles` per dimension.
    pub values: Vec<Vec<f64>>,
    /// One log-weight per particle.
    pub log_weights: Vec<f64>,
}

impl Population {
    /**
    Creates a population of `n_particles` spread deterministically over the
    declared parameter ranges.

    Particle `i`'s value on dimension `d` is the linear interpolation
    `lower_d + (i / N) * (upper_d - lower_d)`, so two runs always start from
    the same configuration.

    # Examples

    ```rust
    use mini_smc::model::ParamSpec;
    use mini_smc::population::Population;

    let specs = [ParamSpec::new("a", 0.0, 1.0)];
    let pop = Population::new(&specs, 4);
    assert_eq!(pop.values[0], vec![0.0, 0.25, 0.5, 0.75]);
    ```
    */
    pub fn new(specs: &[ParamSpec], n_particles: usize) -> Self {
        let values = specs
            .iter()
            .map(|spec| {
                (0..n_particles)
                    .map(|i| {
                        let t = i as f64 / n_particles as f64;
                        spec.lower + t * (spec.upper - spec.lower)
                    })
                    .collect()
            })
            .collect();
        Self {
            values,
            log_weights: vec![0.0; n_particles],
        }
    }

    pub fn n_particles(&self) -> usize {
        self.log_weights.len()
    }

    pub fn n_params(&self) -> usize {
        self.values.len()
    }

    /// Gathers particle `i`'s full parameter vector across the dimension
    /// arrays.
    pub fn particle(&self, i: usize) -> Vec<f64> {
        self.values.iter().map(|dim| dim[i]).collect()
    }

    /// Overwrites every dimension of particle `i` at once.
    pub fn set_particle(&mut self, i: usize, theta: &[f64]) {
        for (dim, &v) in self.values.iter_mut().zip(theta) {
            dim[i] = v;
        }
    }

    /// Replaces row `i` of every dimension array with row `parents[i]`.
    ///
    /// Reads come from a frozen snapshot of the pre-resample arrays, so a
    /// parent row that is itself overwritten earlier in iteration order is
    /// still copied from its old contents.
    pub fn reindex(&mut self, parents: &[usize]) {
        let snapshot = self.values.clone();
        for (d, dim) in self.values.iter_mut().enumerate() {
            for (i, &p) in parents.iter().enumerate() {
                dim[i] = snapshot[d][p];
            }
        }
    }
}
