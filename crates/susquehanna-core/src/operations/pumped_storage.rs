//! Muddy Run pump / generate decision for one hour.

use crate::operations::rules::PumpedStorageRules;
use crate::tables::ReservoirGeometry;

/// Hourly pumped-storage transfer [cfs]. Pumping moves water from Conowingo
/// up to Muddy Run, generation moves it back.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PumpedStorageFlows {
    pub pump: f64,
    pub turbine: f64,
}

impl PumpedStorageFlows {
    /// Net inflow to Conowingo from the transfer.
    pub fn net_to_conowingo(&self) -> f64 {
        self.turbine - self.pump
    }
}

pub fn pumped_storage_flows(
    rules: &PumpedStorageRules,
    muddy_run: &ReservoirGeometry,
    day_of_week: usize,
    hour: usize,
    level_conowingo: f64,
    level_muddy_run: f64,
) -> PumpedStorageFlows {
    let scheduled = rules.schedule.operation(day_of_week, hour);

    // active volume above dead storage, releasable within one hour
    let active = (muddy_run.level_to_storage(level_muddy_run)
        - muddy_run.level_to_storage(rules.dead_level))
        / 3600.0;

    let mut flows = PumpedStorageFlows {
        pump: if scheduled.pump { rules.pump_flow } else { 0.0 },
        turbine: if scheduled.turbine {
            rules.turbine_flow.min(active).max(0.0)
        } else {
            0.0
        },
    };

    if level_conowingo < rules.cavitation_level {
        flows.pump = 0.0;
    }
    if level_muddy_run < rules.dead_level {
        flows.turbine = 0.0;
    }
    flows
}
