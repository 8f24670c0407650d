//! Objective and equity aggregation over a simulated trajectory.
//!
//! Standard objectives, in order:
//!
//! | # | name | unit | direction |
//! |---|------|------|-----------|
//! | 0 | `hydropower_revenue` | M$/year | maximize |
//! | 1 | `atomic_reliability` | - | maximize |
//! | 2 | `baltimore_reliability` | - | maximize |
//! | 3 | `chester_reliability` | - | maximize |
//! | 4 | `environment_shortage` | - | minimize |
//! | 5 | `recreation_reliability` | - | maximize |
//!
//! The extended set appends the Conowingo energy reliability and the equity
//! measures computed over the 6-vector
//! `[atomic, baltimore, chester, environment, recreation, energy]`.

use serde::{Deserialize, Serialize};

use crate::calendar::MONTHS_PER_YEAR;
use crate::data::DemandSeries;
use crate::error::SimulationError;
use crate::metrics;
use crate::simulation::SimulationResult;

const HOURS_PER_YEAR: f64 = 8760.0;

/// Which objective tuple `evaluate` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveSet {
    #[default]
    Standard,
    Extended,
}

impl ObjectiveSet {
    pub const STANDARD_NAMES: [&'static str; 6] = [
        "hydropower_revenue",
        "atomic_reliability",
        "baltimore_reliability",
        "chester_reliability",
        "environment_shortage",
        "recreation_reliability",
    ];

    pub const EXTENDED_NAMES: [&'static str; 13] = [
        "hydropower_revenue",
        "atomic_reliability",
        "baltimore_reliability",
        "chester_reliability",
        "environment_shortage",
        "recreation_reliability",
        "energy_reliability",
        "gini_yearly",
        "euclidean_yearly",
        "gini_monthly_std",
        "euclidean_monthly_std",
        "gini_ratio",
        "euclidean_ratio",
    ];

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            ObjectiveSet::Standard => &Self::STANDARD_NAMES,
            ObjectiveSet::Extended => &Self::EXTENDED_NAMES,
        }
    }

    pub fn count(&self) -> usize {
        self.names().len()
    }
}

/// Annual Conowingo energy target used by the energy reliability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyTarget {
    /// Fraction of the nominal production counted as the target.
    pub devaluation: f64,
    /// Nominal production of the Conowingo and Muddy Run plants [kWh/year].
    pub annual_production: f64,
    /// Share of the nominal production attributed to Conowingo.
    pub conowingo_share: f64,
}

impl Default for EnergyTarget {
    fn default() -> Self {
        Self {
            devaluation: 0.39,
            annual_production: 1.6e9,
            conowingo_share: 572.0 / (572.0 + 1070.0),
        }
    }
}

impl EnergyTarget {
    /// Target production of one day [kWh].
    pub fn daily(&self) -> f64 {
        self.devaluation * self.annual_production * self.conowingo_share * 24.0 / HOURS_PER_YEAR
    }

    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        let ok = self.devaluation > 0.0
            && self.annual_production > 0.0
            && self.conowingo_share > 0.0
            && self.conowingo_share <= 1.0;
        if !ok {
            return Err(crate::error::ConfigError::InvalidParameter(format!(
                "energy target must be positive with a share in (0, 1], got {self:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Objectives {
    pub hydropower_revenue: f64,
    pub atomic_reliability: f64,
    pub baltimore_reliability: f64,
    pub chester_reliability: f64,
    pub environment_shortage: f64,
    pub recreation_reliability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EquityMeasures {
    pub energy_reliability: f64,
    pub gini_yearly: f64,
    pub euclidean_yearly: f64,
    pub gini_monthly_std: f64,
    pub euclidean_monthly_std: f64,
    pub gini_ratio: f64,
    pub euclidean_ratio: f64,
}

/// Equity measures of each calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyEquity {
    pub gini: [f64; MONTHS_PER_YEAR],
    pub euclidean: [f64; MONTHS_PER_YEAR],
}

/// Everything computed from one trajectory. Equity fields other than
/// `energy_reliability` stay zero when equity was not requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub objectives: Objectives,
    pub equity: EquityMeasures,
    pub monthly: MonthlyEquity,
}

impl Aggregation {
    /// Values in the order of `set.names()`.
    pub fn values(&self, set: ObjectiveSet) -> Vec<f64> {
        let o = &self.objectives;
        let mut values = vec![
            o.hydropower_revenue,
            o.atomic_reliability,
            o.baltimore_reliability,
            o.chester_reliability,
            o.environment_shortage,
            o.recreation_reliability,
        ];
        if set == ObjectiveSet::Extended {
            let e = &self.equity;
            values.extend_from_slice(&[
                e.energy_reliability,
                e.gini_yearly,
                e.euclidean_yearly,
                e.gini_monthly_std,
                e.euclidean_monthly_std,
                e.gini_ratio,
                e.euclidean_ratio,
            ]);
        }
        values
    }
}

/// Ordered objective values returned by one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveVector {
    set: ObjectiveSet,
    values: Vec<f64>,
}

impl ObjectiveVector {
    /// Checks that every value is finite.
    pub fn new(set: ObjectiveSet, values: Vec<f64>) -> Result<Self, SimulationError> {
        for (name, &value) in set.names().iter().zip(&values) {
            if !value.is_finite() {
                return Err(SimulationError::NonFinite {
                    objective: name,
                    value,
                });
            }
        }
        Ok(Self { set, values })
    }

    pub fn set(&self) -> ObjectiveSet {
        self.set
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.set.names()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value by objective name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names()
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}

fn equity_series(
    measure: &'static str,
    monthly_vectors: &[[f64; 6]; MONTHS_PER_YEAR],
    yearly_vector: &[f64; 6],
    f: impl Fn(&[f64]) -> Result<f64, SimulationError>,
) -> Result<([f64; MONTHS_PER_YEAR], f64, f64, f64), SimulationError> {
    let mut monthly = [0.0; MONTHS_PER_YEAR];
    for (m, v) in monthly_vectors.iter().enumerate() {
        monthly[m] = f(v)?;
    }
    let yearly = f(yearly_vector)?;
    let std = metrics::std_dev(&monthly);
    let ratio = metrics::dispersion_ratio(measure, std, yearly)?;
    Ok((monthly, yearly, std, ratio))
}

/// Aggregate a trajectory into objectives and, with `with_equity`, the
/// monthly and yearly equity measures.
pub fn aggregate(
    result: &SimulationResult,
    demands: &DemandSeries,
    energy_target: &EnergyTarget,
    with_equity: bool,
) -> Result<Aggregation, SimulationError> {
    let days = &result.days;
    let n_years = result.n_years.max(1) as f64;

    let atomic = metrics::daily_reliability(&days.release_atomic, &demands.atomic);
    let baltimore = metrics::daily_reliability(&days.release_baltimore, &demands.baltimore);
    let chester = metrics::daily_reliability(&days.release_chester, &demands.chester);
    let environment = metrics::daily_shortage(&days.release_downstream, &demands.min_flow);
    let recreation =
        metrics::storage_reliability(&days.level_conowingo, &demands.recreation_target);

    let daily_target = energy_target.daily();
    let energy: Vec<f64> = days
        .conowingo_energy
        .iter()
        .map(|e| e / daily_target)
        .collect();

    let objectives = Objectives {
        hydropower_revenue: days.conowingo_revenue.iter().sum::<f64>() / n_years / 1.0e6,
        atomic_reliability: metrics::mean(&atomic),
        baltimore_reliability: metrics::mean(&baltimore),
        chester_reliability: metrics::mean(&chester),
        environment_shortage: metrics::mean(&environment),
        recreation_reliability: recreation,
    };
    let energy_reliability = metrics::mean(&energy);
    if !with_equity {
        return Ok(Aggregation {
            objectives,
            equity: EquityMeasures {
                energy_reliability,
                ..EquityMeasures::default()
            },
            monthly: MonthlyEquity::default(),
        });
    }

    let monthly_atomic = metrics::monthly_average(&atomic);
    let monthly_baltimore = metrics::monthly_average(&baltimore);
    let monthly_chester = metrics::monthly_average(&chester);
    let monthly_environment = metrics::monthly_average(&environment);
    let monthly_energy = metrics::monthly_average(&energy);

    let mut monthly_vectors = [[0.0; 6]; MONTHS_PER_YEAR];
    for (m, v) in monthly_vectors.iter_mut().enumerate() {
        *v = [
            monthly_atomic[m],
            monthly_baltimore[m],
            monthly_chester[m],
            monthly_environment[m],
            recreation,
            monthly_energy[m],
        ];
    }
    let yearly_vector = [
        objectives.atomic_reliability,
        objectives.baltimore_reliability,
        objectives.chester_reliability,
        objectives.environment_shortage,
        objectives.recreation_reliability,
        energy_reliability,
    ];

    let (gini_monthly, gini_yearly, gini_std, gini_ratio) =
        equity_series("gini ratio", &monthly_vectors, &yearly_vector, metrics::gini)?;
    let (eucli_monthly, eucli_yearly, eucli_std, eucli_ratio) = equity_series(
        "euclidean ratio",
        &monthly_vectors,
        &yearly_vector,
        |v| Ok(metrics::euclidean(v)),
    )?;

    Ok(Aggregation {
        objectives,
        equity: EquityMeasures {
            energy_reliability,
            gini_yearly,
            euclidean_yearly: eucli_yearly,
            gini_monthly_std: gini_std,
            euclidean_monthly_std: eucli_std,
            gini_ratio,
            euclidean_ratio: eucli_ratio,
        },
        monthly: MonthlyEquity {
            gini: gini_monthly,
            euclidean: eucli_monthly,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DAYS_PER_YEAR;
    use crate::simulation::{DayRecord, DayRecordSeries, SimulationResult, SystemState};
    use crate::synthetic;
    use approx::assert_relative_eq;

    fn flat_demands() -> DemandSeries {
        DemandSeries::new(
            vec![40.0; DAYS_PER_YEAR],
            vec![150.0; DAYS_PER_YEAR],
            vec![30.0; DAYS_PER_YEAR],
            vec![5000.0; DAYS_PER_YEAR],
            vec![0.0; DAYS_PER_YEAR],
        )
        .unwrap()
    }

    fn result_with(record: DayRecord) -> SimulationResult {
        let tables = synthetic::reference_tables().unwrap();
        let mut days = DayRecordSeries::with_capacity(DAYS_PER_YEAR);
        for _ in 0..DAYS_PER_YEAR {
            days.push(&record);
        }
        SimulationResult {
            days,
            final_state: SystemState::from_levels(&tables, 108.5, 505.0),
            n_years: 1,
        }
    }

    #[test]
    fn daily_energy_target() {
        let t = EnergyTarget::default();
        let expected = 0.39 * 1.6e9 * 572.0 / 1642.0 / 365.0;
        assert_relative_eq!(t.daily(), expected, max_relative = 1e-12);
    }

    #[test]
    fn full_delivery_is_equitable() {
        let target = EnergyTarget::default();
        let record = DayRecord {
            level_conowingo: 108.0,
            release_atomic: 40.0,
            release_baltimore: 150.0,
            release_chester: 30.0,
            release_downstream: 5000.0,
            conowingo_energy: target.daily(),
            conowingo_revenue: 1000.0,
            ..DayRecord::default()
        };
        let agg = aggregate(&result_with(record), &flat_demands(), &target, true).unwrap();
        let o = agg.objectives;
        assert_relative_eq!(o.hydropower_revenue, 0.365);
        assert_relative_eq!(o.atomic_reliability, 1.0);
        assert_relative_eq!(o.baltimore_reliability, 1.0);
        assert_relative_eq!(o.chester_reliability, 1.0);
        assert_relative_eq!(o.environment_shortage, 0.0);
        assert_relative_eq!(o.recreation_reliability, 1.0);
        assert_relative_eq!(agg.equity.energy_reliability, 1.0, max_relative = 1e-12);

        // [1, 1, 1, 0, 1, 1]: five pairs differ by 1
        assert_relative_eq!(agg.equity.euclidean_yearly, 5.0, max_relative = 1e-12);
        let mean = 5.0 / 6.0;
        assert_relative_eq!(
            agg.equity.gini_yearly,
            5.0 / (2.0 * 36.0 * mean),
            max_relative = 1e-12
        );
        // identical months give no monthly dispersion
        assert_relative_eq!(agg.equity.gini_monthly_std, 0.0, epsilon = 1e-12);
        assert_relative_eq!(agg.equity.gini_ratio, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn half_delivery() {
        let record = DayRecord {
            release_atomic: 20.0,
            release_baltimore: 75.0,
            release_chester: 15.0,
            release_downstream: 2500.0,
            ..DayRecord::default()
        };
        let agg = aggregate(
            &result_with(record),
            &flat_demands(),
            &EnergyTarget::default(),
            false,
        )
        .unwrap();
        assert_relative_eq!(agg.objectives.atomic_reliability, 0.5);
        assert_relative_eq!(agg.objectives.environment_shortage, 0.25);
        assert_eq!(agg.objectives.hydropower_revenue, 0.0);
    }

    #[test]
    fn undefined_equity_only_fails_when_requested() {
        // negative energy makes the yearly mean of the equity vector negative
        let target = EnergyTarget::default();
        let record = DayRecord {
            level_conowingo: 108.0,
            release_atomic: 40.0,
            release_baltimore: 150.0,
            release_chester: 30.0,
            release_downstream: 5000.0,
            conowingo_energy: -10.0 * target.daily(),
            ..DayRecord::default()
        };
        let result = result_with(record);

        let agg = aggregate(&result, &flat_demands(), &target, false).unwrap();
        assert_relative_eq!(agg.objectives.atomic_reliability, 1.0);
        assert_relative_eq!(agg.equity.energy_reliability, -10.0, max_relative = 1e-12);
        assert_eq!(agg.equity.gini_yearly, 0.0);
        assert_eq!(agg.monthly, MonthlyEquity::default());

        let err = aggregate(&result, &flat_demands(), &target, true).unwrap_err();
        assert!(matches!(err, SimulationError::DegenerateEquity { .. }));
    }

    #[test]
    fn extended_values_follow_names() {
        let agg = Aggregation {
            objectives: Objectives {
                hydropower_revenue: 1.0,
                ..Objectives::default()
            },
            equity: EquityMeasures {
                euclidean_ratio: 13.0,
                ..EquityMeasures::default()
            },
            monthly: MonthlyEquity::default(),
        };
        let v = ObjectiveVector::new(
            ObjectiveSet::Extended,
            agg.values(ObjectiveSet::Extended),
        )
        .unwrap();
        assert_eq!(v.len(), 13);
        assert_eq!(v.get("hydropower_revenue"), Some(1.0));
        assert_eq!(v.get("euclidean_ratio"), Some(13.0));
        assert_eq!(agg.values(ObjectiveSet::Standard).len(), 6);
    }

    #[test]
    fn non_finite_objective_is_rejected() {
        let values = vec![0.0, f64::NAN, 0.0, 0.0, 0.0, 0.0];
        let err = ObjectiveVector::new(ObjectiveSet::Standard, values).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NonFinite {
                objective: "atomic_reliability",
                ..
            }
        ));
    }
}
