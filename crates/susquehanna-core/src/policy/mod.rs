//! Release policy: the RBF law wrapped with input and output scaling.
//!
//! Inputs are the decision step within the year and the Conowingo level,
//! both mapped to [0, 1]. The four outputs are scaled back to flows for the
//! atomic plant, Baltimore, Chester and the downstream release.

pub mod rbf;

pub use rbf::{RbfPolicy, RbfShape};

use crate::calendar::DAYS_PER_YEAR;
use crate::data::demand::DemandSeries;
use crate::error::ConfigError;
use crate::operations::{OperatingRules, Releases};

pub const POLICY_INPUTS: usize = 2;
pub const POLICY_OUTPUTS: usize = 4;

/// Level used to normalize the Conowingo level input [ft].
pub const LEVEL_SCALE: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyScaling {
    pub input_max: [f64; POLICY_INPUTS],
    pub output_max: [f64; POLICY_OUTPUTS],
}

impl PolicyScaling {
    /// Decision-step and level scales on the input side; peak demands and
    /// the turbine capacity on the output side.
    pub fn new(demands: &DemandSeries, rules: &OperatingRules) -> Self {
        let steps_per_year = DAYS_PER_YEAR * rules.decisions_per_day();
        let peak = demands.max_demand();
        Self {
            input_max: [(steps_per_year - 1) as f64, LEVEL_SCALE],
            output_max: [
                peak.atomic,
                peak.baltimore,
                peak.chester,
                rules.turbine_capacity,
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReleasePolicy {
    rbf: RbfPolicy,
    scaling: PolicyScaling,
}

impl ReleasePolicy {
    pub fn new(rbf: RbfPolicy, scaling: PolicyScaling) -> Result<Self, ConfigError> {
        let shape = rbf.shape();
        if shape.n_inputs != POLICY_INPUTS || shape.n_outputs != POLICY_OUTPUTS {
            return Err(ConfigError::InvalidParameter(format!(
                "release policy needs {POLICY_INPUTS} inputs and {POLICY_OUTPUTS} outputs, \
                 got {} and {}",
                shape.n_inputs, shape.n_outputs
            )));
        }
        Ok(Self { rbf, scaling })
    }

    /// Requested releases [cfs] at a decision step of the year and a level [ft].
    pub fn decide(&self, step_of_year: usize, level: f64) -> Releases {
        let [step_max, level_max] = self.scaling.input_max;
        let input = [step_of_year as f64 / step_max, level / level_max];
        let u = self.rbf.apply(&input);
        let m = self.scaling.output_max;
        Releases::new(u[0] * m[0], u[1] * m[1], u[2] * m[2], u[3] * m[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demands() -> DemandSeries {
        let y = |v: f64| vec![v; DAYS_PER_YEAR];
        DemandSeries::new(y(40.0), y(150.0), y(30.0), y(4000.0), y(0.0)).unwrap()
    }

    #[test]
    fn reference_scaling() {
        let s = PolicyScaling::new(&demands(), &OperatingRules::default());
        assert_eq!(s.input_max, [2189.0, 120.0]);
        assert_eq!(s.output_max, [40.0, 150.0, 30.0, 85_412.0]);
    }

    #[test]
    fn decisions_are_within_scaled_range() {
        let shape = RbfShape::default();
        let vars: Vec<f64> = shape
            .bounds()
            .iter()
            .enumerate()
            .map(|(i, (lo, hi))| lo + (hi - lo) * ((i % 5) as f64 / 4.0))
            .collect();
        let rbf = RbfPolicy::from_decision_vars(shape, &vars).unwrap();
        let scaling = PolicyScaling::new(&demands(), &OperatingRules::default());
        let policy = ReleasePolicy::new(rbf, scaling).unwrap();
        for step in [0, 700, 2189] {
            let r = policy.decide(step, 107.0);
            assert!((0.0..=40.0).contains(&r.atomic));
            assert!((0.0..=150.0).contains(&r.baltimore));
            assert!((0.0..=30.0).contains(&r.chester));
            assert!((0.0..=85_412.0).contains(&r.downstream));
        }
    }

    #[test]
    fn rejects_wrong_output_count() {
        let shape = RbfShape {
            n_rbfs: 2,
            n_inputs: 2,
            n_outputs: 3,
        };
        let rbf = RbfPolicy::from_decision_vars(shape, &vec![0.0; shape.n_params()]).unwrap();
        let scaling = PolicyScaling::new(&demands(), &OperatingRules::default());
        assert!(ReleasePolicy::new(rbf, scaling).is_err());
    }
}
