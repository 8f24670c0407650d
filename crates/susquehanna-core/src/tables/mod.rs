//! Physical relationship tables of the Conowingo / Muddy Run system.
//!
//! Everything here is built once per model and read-only afterwards.

pub mod constants;
pub mod geometry;
pub mod turbines;

use constants::{MUDDY_RUN_UNITS, SPILLWAY_ROWS, TAILWATER_ROWS};
pub use geometry::ReservoirGeometry;
pub use turbines::{hydraulic_power_kw, PumpTurbineUnits, TurbineBank, TurbineUnit};

use crate::error::ConfigError;
use crate::interpolation::PiecewiseLinear;

#[derive(Debug, Clone)]
pub struct PhysicalTables {
    pub conowingo: ReservoirGeometry,
    pub muddy_run: ReservoirGeometry,
    /// Release [cfs] -> tailwater level [ft].
    pub tailwater: PiecewiseLinear,
    /// Level [ft] -> maximum spillway discharge [cfs].
    pub spillway_max: PiecewiseLinear,
    /// Level [ft] -> minimum spillway discharge [cfs].
    pub spillway_min: PiecewiseLinear,
    pub conowingo_turbines: TurbineBank,
    pub muddy_run_units: PumpTurbineUnits,
}

/// Raw matrices as read from disk or generated.
#[derive(Debug, Clone, Default)]
pub struct TableRows {
    pub conowingo_lsv: Vec<Vec<f64>>,
    pub muddy_run_lsv: Vec<Vec<f64>>,
    pub tailwater: Vec<Vec<f64>>,
    pub spillways: Vec<Vec<f64>>,
    pub conowingo_turbines: Vec<Vec<f64>>,
    pub muddy_run_units: Vec<f64>,
}

fn check_rows(name: &str, rows: &[Vec<f64>], expected: usize) -> Result<(), ConfigError> {
    if rows.len() != expected {
        return Err(ConfigError::DimensionMismatch {
            name: format!("{name} rows"),
            expected,
            actual: rows.len(),
        });
    }
    Ok(())
}

impl PhysicalTables {
    pub fn from_rows(rows: &TableRows) -> Result<Self, ConfigError> {
        let conowingo = ReservoirGeometry::from_rows("conowingo", &rows.conowingo_lsv)?;
        let muddy_run = ReservoirGeometry::from_rows("muddy_run", &rows.muddy_run_lsv)?;

        check_rows("tailwater", &rows.tailwater, TAILWATER_ROWS)?;
        let tailwater = PiecewiseLinear::new(
            "tailwater",
            rows.tailwater[0].clone(),
            rows.tailwater[1].clone(),
        )?;

        check_rows("spillways", &rows.spillways, SPILLWAY_ROWS)?;
        let spillway_max = PiecewiseLinear::new(
            "spillway max",
            rows.spillways[0].clone(),
            rows.spillways[1].clone(),
        )?;
        let spillway_min = PiecewiseLinear::new(
            "spillway min",
            rows.spillways[0].clone(),
            rows.spillways[2].clone(),
        )?;

        let conowingo_turbines = TurbineBank::from_rows(&rows.conowingo_turbines)?;
        let muddy_run_units =
            PumpTurbineUnits::from_vector(&rows.muddy_run_units, MUDDY_RUN_UNITS)?;

        Ok(Self {
            conowingo,
            muddy_run,
            tailwater,
            spillway_max,
            spillway_min,
            conowingo_turbines,
            muddy_run_units,
        })
    }

    /// Tailwater level [ft] for a Conowingo release [cfs].
    pub fn tailwater_level(&self, release: f64) -> f64 {
        self.tailwater.eval(release)
    }
}
