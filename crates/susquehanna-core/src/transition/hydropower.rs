//! Hourly hydropower production and revenue.
//!
//! Energies are in kWh (hourly power in kW integrated over one hour),
//! revenues in $ with prices in $/MWh.

use crate::operations::PumpedStorageFlows;
use crate::tables::{PhysicalTables, PumpTurbineUnits};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HydropowerOutput {
    pub conowingo_energy: f64,
    pub conowingo_revenue: f64,
    pub muddy_run_energy: f64,
    pub muddy_run_revenue: f64,
    /// Energy consumed by pumping at Muddy Run.
    pub muddy_run_pump_energy: f64,
    pub muddy_run_pump_cost: f64,
}

impl HydropowerOutput {
    pub fn accumulate(&mut self, other: &HydropowerOutput) {
        self.conowingo_energy += other.conowingo_energy;
        self.conowingo_revenue += other.conowingo_revenue;
        self.muddy_run_energy += other.muddy_run_energy;
        self.muddy_run_revenue += other.muddy_run_revenue;
        self.muddy_run_pump_energy += other.muddy_run_pump_energy;
        self.muddy_run_pump_cost += other.muddy_run_pump_cost;
    }
}

#[inline]
fn revenue(energy_kwh: f64, price: f64) -> f64 {
    energy_kwh / 1000.0 * price
}

/// Conowingo generation for one hour of `release` [cfs] at `level` [ft].
pub fn conowingo_hour(
    tables: &PhysicalTables,
    release: f64,
    level: f64,
    price: f64,
) -> (f64, f64) {
    let head = (level - tables.tailwater_level(release)).max(0.0);
    let energy = tables.conowingo_turbines.power(release, head);
    (energy, revenue(energy, price))
}

/// Muddy Run generation and pumping for one hour.
pub fn muddy_run_hour(
    units: &PumpTurbineUnits,
    flows: &PumpedStorageFlows,
    level_conowingo: f64,
    level_muddy_run: f64,
    price: f64,
) -> HydropowerOutput {
    let head = (level_muddy_run - level_conowingo).max(0.0);
    let generated = units.turbine_power(flows.turbine, head);
    let pumped = units.pump_power(flows.pump, head);
    HydropowerOutput {
        muddy_run_energy: generated,
        muddy_run_revenue: revenue(generated, price),
        muddy_run_pump_energy: pumped,
        muddy_run_pump_cost: revenue(pumped, price),
        ..HydropowerOutput::default()
    }
}
