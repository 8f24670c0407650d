//! Turbine banks and pump-turbine units.
//!
//! A release is split greedily across the units in table order: a unit runs
//! at the remaining flow, capped at its maximum, and stays idle when the
//! remaining flow is below its minimum.

use smallvec::SmallVec;

use super::constants::{GRAVITY, PUMP_TURBINE_FIELDS, TURBINE_ROWS, WATER_DENSITY};
use crate::error::ConfigError;
use crate::units::{CUBIC_METERS_PER_CUBIC_FOOT, METERS_PER_FOOT};

/// Hydraulic power [kW] of a flow [cfs] through a head [ft] at a given
/// efficiency. Over one hour this is also the energy in kWh.
#[inline]
pub fn hydraulic_power_kw(efficiency: f64, flow_cfs: f64, head_ft: f64) -> f64 {
    efficiency
        * GRAVITY
        * WATER_DENSITY
        * (CUBIC_METERS_PER_CUBIC_FOOT * flow_cfs)
        * (METERS_PER_FOOT * head_ft)
        / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurbineUnit {
    /// Maximum throughput [cfs].
    pub max_flow: f64,
    /// Minimum throughput [cfs].
    pub min_flow: f64,
    /// Efficiency [-].
    pub efficiency: f64,
}

#[derive(Debug, Clone)]
pub struct TurbineBank {
    units: Vec<TurbineUnit>,
}

impl TurbineBank {
    pub fn new(units: Vec<TurbineUnit>) -> Result<Self, ConfigError> {
        if units.is_empty() {
            return Err(ConfigError::InvalidTable {
                table: "turbines".to_string(),
                reason: "no turbine units".to_string(),
            });
        }
        for (i, u) in units.iter().enumerate() {
            let ok = u.min_flow >= 0.0
                && u.max_flow >= u.min_flow
                && u.efficiency > 0.0
                && u.efficiency <= 1.0;
            if !ok {
                return Err(ConfigError::InvalidTable {
                    table: "turbines".to_string(),
                    reason: format!(
                        "unit {i}: min {} max {} efficiency {}",
                        u.min_flow, u.max_flow, u.efficiency
                    ),
                });
            }
        }
        Ok(Self { units })
    }

    /// Build from a 3-row matrix `[max flows, min flows, efficiencies]`.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ConfigError> {
        if rows.len() != TURBINE_ROWS {
            return Err(ConfigError::DimensionMismatch {
                name: "turbine table rows".to_string(),
                expected: TURBINE_ROWS,
                actual: rows.len(),
            });
        }
        let n = rows[0].len();
        for r in &rows[1..] {
            if r.len() != n {
                return Err(ConfigError::DimensionMismatch {
                    name: "turbine table columns".to_string(),
                    expected: n,
                    actual: r.len(),
                });
            }
        }
        let units = (0..n)
            .map(|j| TurbineUnit {
                max_flow: rows[0][j],
                min_flow: rows[1][j],
                efficiency: rows[2][j],
            })
            .collect();
        Self::new(units)
    }

    pub fn units(&self) -> &[TurbineUnit] {
        &self.units
    }

    /// Sum of unit maxima [cfs].
    pub fn total_capacity(&self) -> f64 {
        self.units.iter().map(|u| u.max_flow).sum()
    }

    /// Flow assigned to each unit for a total release [cfs].
    pub fn dispatch(&self, release: f64) -> SmallVec<[f64; 16]> {
        let mut remaining = release.max(0.0);
        self.units
            .iter()
            .map(|u| {
                let q = if remaining < u.min_flow {
                    0.0
                } else {
                    remaining.min(u.max_flow)
                };
                remaining -= q;
                q
            })
            .collect()
    }

    /// Power [kW] produced by a release [cfs] under a head [ft].
    pub fn power(&self, release: f64, head: f64) -> f64 {
        self.dispatch(release)
            .iter()
            .zip(&self.units)
            .map(|(&q, u)| hydraulic_power_kw(u.efficiency, q, head))
            .sum()
    }
}

/// Identical reversible units of a pumped-storage plant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpTurbineUnits {
    pub n_units: usize,
    /// Turbine capacity per unit [cfs].
    pub turbine_capacity: f64,
    pub turbine_efficiency: f64,
    /// Pumping capacity per unit [cfs].
    pub pump_capacity: f64,
    pub pump_efficiency: f64,
}

impl PumpTurbineUnits {
    /// Build from `[turbine capacity, turbine efficiency, pump capacity, pump efficiency]`.
    pub fn from_vector(values: &[f64], n_units: usize) -> Result<Self, ConfigError> {
        if values.len() != PUMP_TURBINE_FIELDS {
            return Err(ConfigError::DimensionMismatch {
                name: "pump-turbine unit vector".to_string(),
                expected: PUMP_TURBINE_FIELDS,
                actual: values.len(),
            });
        }
        let units = Self {
            n_units,
            turbine_capacity: values[0],
            turbine_efficiency: values[1],
            pump_capacity: values[2],
            pump_efficiency: values[3],
        };
        units.validate()?;
        Ok(units)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let efficiencies_ok = [self.turbine_efficiency, self.pump_efficiency]
            .iter()
            .all(|&e| e > 0.0 && e <= 1.0);
        if self.n_units == 0
            || self.turbine_capacity < 0.0
            || self.pump_capacity < 0.0
            || !efficiencies_ok
        {
            return Err(ConfigError::InvalidTable {
                table: "pump-turbine units".to_string(),
                reason: format!("{self:?}"),
            });
        }
        Ok(())
    }

    fn split(&self, flow: f64, capacity: f64) -> impl Iterator<Item = f64> {
        let mut remaining = flow.max(0.0);
        (0..self.n_units).map(move |_| {
            let q = remaining.min(capacity);
            remaining -= q;
            q
        })
    }

    /// Generation [kW] when releasing `flow` [cfs] through `head` [ft].
    pub fn turbine_power(&self, flow: f64, head: f64) -> f64 {
        self.split(flow, self.turbine_capacity)
            .map(|q| hydraulic_power_kw(self.turbine_efficiency, q, head))
            .sum()
    }

    /// Power [kW] associated with pumping `flow` [cfs] against `head` [ft].
    pub fn pump_power(&self, flow: f64, head: f64) -> f64 {
        self.split(flow, self.pump_capacity)
            .map(|q| hydraulic_power_kw(self.pump_efficiency, q, head))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bank() -> TurbineBank {
        TurbineBank::from_rows(&[
            vec![1000.0, 2000.0, 3000.0],
            vec![500.0, 500.0, 2500.0],
            vec![0.8, 0.8, 0.9],
        ])
        .unwrap()
    }

    #[test]
    fn dispatch_fills_units_in_order() {
        let q = bank().dispatch(2500.0);
        assert_eq!(q.as_slice(), &[1000.0, 1500.0, 0.0]);
    }

    #[test]
    fn dispatch_skips_unit_below_minimum() {
        // 400 left after nothing: below unit 0 minimum (500)
        let q = bank().dispatch(400.0);
        assert_eq!(q.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn dispatch_caps_at_capacity() {
        let q = bank().dispatch(10_000.0);
        assert_eq!(q.as_slice(), &[1000.0, 2000.0, 3000.0]);
        assert_relative_eq!(bank().total_capacity(), 6000.0);
    }

    #[test]
    fn negative_release_dispatches_nothing() {
        assert!(bank().dispatch(-5.0).iter().all(|&q| q == 0.0));
    }

    #[test]
    fn hydraulic_power_known_value() {
        // 0.79 * 9.81 * 1000 * (0.0283 * 1000) * (0.3048 * 100) / 1000
        let expected = 0.79 * 9.81 * 1000.0 * 28.3 * 30.48 / 1000.0;
        assert_relative_eq!(hydraulic_power_kw(0.79, 1000.0, 100.0), expected);
    }

    #[test]
    fn zero_head_no_power() {
        assert_eq!(bank().power(2000.0, 0.0), 0.0);
    }

    #[test]
    fn rejects_min_above_max() {
        let err = TurbineBank::new(vec![TurbineUnit {
            max_flow: 10.0,
            min_flow: 20.0,
            efficiency: 0.8,
        }]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = TurbineBank::from_rows(&[vec![1.0, 2.0], vec![0.0], vec![0.8, 0.8]]);
        assert!(matches!(err, Err(ConfigError::DimensionMismatch { .. })));
    }

    #[test]
    fn pump_turbine_split_across_units() {
        let units = PumpTurbineUnits::from_vector(&[4000.0, 0.9, 3100.0, 0.85], 8).unwrap();
        let full = units.turbine_power(32_000.0, 400.0);
        let over = units.turbine_power(50_000.0, 400.0);
        assert_relative_eq!(full, over);
        assert_relative_eq!(full, hydraulic_power_kw(0.9, 32_000.0, 400.0), epsilon = 1e-6);
    }

    #[test]
    fn pump_power_positive_for_positive_head() {
        let units = PumpTurbineUnits::from_vector(&[4000.0, 0.9, 3100.0, 0.85], 8).unwrap();
        assert!(units.pump_power(24_800.0, 400.0) > 0.0);
        assert_eq!(units.pump_power(0.0, 400.0), 0.0);
    }

    #[test]
    fn pump_turbine_rejects_wrong_length() {
        assert!(PumpTurbineUnits::from_vector(&[1.0, 0.9], 8).is_err());
    }
}
