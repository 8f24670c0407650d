//! Gaussian radial-basis-function control law.
//!
//! Decision vector layout, for `n_rbfs` functions over `n_inputs` inputs and
//! `n_outputs` outputs:
//!
//! ```text
//! [c_00, r_00, c_01, r_01, ..., c_(K-1)(I-1), r_(K-1)(I-1),   centers/radii, rbf-major
//!  w_00, w_01, ..., w_(K-1)(O-1)]                             weights, rbf-major
//! ```
//!
//! Centers live in [-1, 1], radii and weights in [0, 1].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// Radii below this are treated as this value.
const MIN_RADIUS: f64 = 1e-12;

pub const CENTER_BOUNDS: (f64, f64) = (-1.0, 1.0);
pub const RADIUS_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const WEIGHT_BOUNDS: (f64, f64) = (0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbfShape {
    pub n_rbfs: usize,
    pub n_inputs: usize,
    pub n_outputs: usize,
}

impl Default for RbfShape {
    fn default() -> Self {
        Self {
            n_rbfs: 4,
            n_inputs: 2,
            n_outputs: 4,
        }
    }
}

impl RbfShape {
    /// Length of the decision vector.
    pub fn n_params(&self) -> usize {
        self.n_rbfs * (2 * self.n_inputs + self.n_outputs)
    }

    fn n_shape_params(&self) -> usize {
        self.n_rbfs * 2 * self.n_inputs
    }

    /// Per-variable `(min, max)` bounds in decision vector order.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = Vec::with_capacity(self.n_params());
        for _ in 0..self.n_rbfs * self.n_inputs {
            bounds.push(CENTER_BOUNDS);
            bounds.push(RADIUS_BOUNDS);
        }
        bounds.extend(std::iter::repeat(WEIGHT_BOUNDS).take(self.n_rbfs * self.n_outputs));
        bounds
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_rbfs == 0 || self.n_inputs == 0 || self.n_outputs == 0 {
            return Err(ConfigError::InvalidParameter(format!(
                "rbf shape must be non-empty, got {self:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Basis {
    center: f64,
    radius: f64,
}

/// A decoded RBF policy. Built per evaluation, never stored on the model.
#[derive(Debug, Clone)]
pub struct RbfPolicy {
    shape: RbfShape,
    /// `n_rbfs * n_inputs`, rbf-major.
    basis: Vec<Basis>,
    /// `n_rbfs * n_outputs`, rbf-major, normalized per output.
    weights: Vec<f64>,
}

impl RbfPolicy {
    /// Decode a decision vector. Fails on a wrong length or on any value
    /// that is non-finite or outside its bound.
    pub fn from_decision_vars(shape: RbfShape, vars: &[f64]) -> Result<Self, ConfigError> {
        shape.validate()?;
        if vars.len() != shape.n_params() {
            return Err(ConfigError::DecisionVectorLength {
                expected: shape.n_params(),
                actual: vars.len(),
            });
        }
        for (index, (&value, (min, max))) in vars.iter().zip(shape.bounds()).enumerate() {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::DecisionVariableOutOfBounds {
                    index,
                    value,
                    min,
                    max,
                });
            }
        }

        let (shape_params, raw_weights) = vars.split_at(shape.n_shape_params());
        let basis = shape_params
            .chunks_exact(2)
            .map(|cr| Basis {
                center: cr[0],
                radius: cr[1].max(MIN_RADIUS),
            })
            .collect();

        let mut weights = raw_weights.to_vec();
        for o in 0..shape.n_outputs {
            let total: f64 = (0..shape.n_rbfs)
                .map(|k| weights[k * shape.n_outputs + o])
                .sum();
            for k in 0..shape.n_rbfs {
                let w = &mut weights[k * shape.n_outputs + o];
                *w = if total > 0.0 {
                    *w / total
                } else {
                    1.0 / shape.n_rbfs as f64
                };
            }
        }

        Ok(Self {
            shape,
            basis,
            weights,
        })
    }

    pub fn shape(&self) -> RbfShape {
        self.shape
    }

    /// Normalized outputs in [0, 1] for normalized inputs.
    pub fn apply(&self, inputs: &[f64]) -> SmallVec<[f64; 4]> {
        debug_assert_eq!(inputs.len(), self.shape.n_inputs);
        let n_in = self.shape.n_inputs;
        let n_out = self.shape.n_outputs;
        let mut out: SmallVec<[f64; 4]> = SmallVec::from_elem(0.0, n_out);

        for k in 0..self.shape.n_rbfs {
            let dist: f64 = self.basis[k * n_in..(k + 1) * n_in]
                .iter()
                .zip(inputs)
                .map(|(b, &x)| (x - b.center).powi(2) / b.radius.powi(2))
                .sum();
            let phi = (-dist).exp();
            for (o, u) in out.iter_mut().enumerate() {
                *u += self.weights[k * n_out + o] * phi;
            }
        }

        for u in out.iter_mut() {
            *u = u.clamp(0.0, 1.0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn one_rbf() -> RbfShape {
        RbfShape {
            n_rbfs: 1,
            n_inputs: 2,
            n_outputs: 2,
        }
    }

    #[test]
    fn default_shape_has_32_params() {
        assert_eq!(RbfShape::default().n_params(), 32);
        assert_eq!(RbfShape::default().bounds().len(), 32);
    }

    #[test]
    fn bounds_layout() {
        let b = one_rbf().bounds();
        assert_eq!(b[0], CENTER_BOUNDS);
        assert_eq!(b[1], RADIUS_BOUNDS);
        assert_eq!(b[2], CENTER_BOUNDS);
        assert_eq!(b[3], RADIUS_BOUNDS);
        assert_eq!(b[4], WEIGHT_BOUNDS);
    }

    #[test]
    fn at_center_output_equals_weight() {
        // single rbf: normalized weight is 1 whatever its raw value
        let p = RbfPolicy::from_decision_vars(one_rbf(), &[0.5, 0.3, 0.2, 0.4, 0.7, 0.0]).unwrap();
        let u = p.apply(&[0.5, 0.2]);
        assert_relative_eq!(u[0], 1.0);
        assert_relative_eq!(u[1], 1.0);
    }

    #[test]
    fn gaussian_decay() {
        let p = RbfPolicy::from_decision_vars(one_rbf(), &[0.0, 1.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        let u = p.apply(&[1.0, 0.0]);
        assert_relative_eq!(u[0], (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn zero_vector_gives_bounded_outputs() {
        let shape = RbfShape::default();
        let p = RbfPolicy::from_decision_vars(shape, &vec![0.0; shape.n_params()]).unwrap();
        for x in [[0.0, 0.9], [0.5, 0.5], [1.0, 1.0]] {
            let u = p.apply(&x);
            assert_eq!(u.len(), 4);
            assert!(u.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn zero_weights_become_uniform() {
        let shape = RbfShape {
            n_rbfs: 2,
            n_inputs: 1,
            n_outputs: 1,
        };
        // both rbfs centered on the input with unit radius
        let p = RbfPolicy::from_decision_vars(shape, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(p.apply(&[0.0])[0], 1.0);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = RbfPolicy::from_decision_vars(RbfShape::default(), &[0.0; 31]);
        assert!(matches!(
            err,
            Err(ConfigError::DecisionVectorLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn rejects_out_of_bounds_and_nan() {
        let mut vars = vec![0.0; 6];
        vars[1] = -0.1;
        assert!(matches!(
            RbfPolicy::from_decision_vars(one_rbf(), &vars),
            Err(ConfigError::DecisionVariableOutOfBounds { index: 1, .. })
        ));
        vars[1] = 0.0;
        vars[5] = f64::NAN;
        assert!(RbfPolicy::from_decision_vars(one_rbf(), &vars).is_err());
    }
}
