use susquehanna_macros::Trajectory;

use crate::operations::{PumpedStorageFlows, Releases};
use crate::simulation::state::SystemState;
use crate::transition::HydropowerOutput;

/// One simulated day: start-of-day state, mean flows and summed hydropower.
#[derive(Debug, Clone, Copy, PartialEq, Default, Trajectory)]
pub struct DayRecord {
    pub level_conowingo: f64,
    pub storage_conowingo: f64,
    pub level_muddy_run: f64,
    pub storage_muddy_run: f64,
    pub release_atomic: f64,
    pub release_baltimore: f64,
    pub release_chester: f64,
    pub release_downstream: f64,
    pub pump_flow: f64,
    pub turbine_flow: f64,
    pub conowingo_energy: f64,
    pub conowingo_revenue: f64,
    pub muddy_run_energy: f64,
    pub muddy_run_revenue: f64,
    pub muddy_run_pump_energy: f64,
    pub muddy_run_pump_cost: f64,
}

impl DayRecord {
    pub fn new(
        start: &SystemState,
        releases: Releases,
        pumped: PumpedStorageFlows,
        hydropower: &HydropowerOutput,
    ) -> Self {
        Self {
            level_conowingo: start.conowingo.level(),
            storage_conowingo: start.conowingo.storage(),
            level_muddy_run: start.muddy_run.level(),
            storage_muddy_run: start.muddy_run.storage(),
            release_atomic: releases.atomic,
            release_baltimore: releases.baltimore,
            release_chester: releases.chester,
            release_downstream: releases.downstream,
            pump_flow: pumped.pump,
            turbine_flow: pumped.turbine,
            conowingo_energy: hydropower.conowingo_energy,
            conowingo_revenue: hydropower.conowingo_revenue,
            muddy_run_energy: hydropower.muddy_run_energy,
            muddy_run_revenue: hydropower.muddy_run_revenue,
            muddy_run_pump_energy: hydropower.muddy_run_pump_energy,
            muddy_run_pump_cost: hydropower.muddy_run_pump_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_columns_follow_record_fields() {
        let mut days = DayRecordSeries::with_capacity(2);
        days.push(&DayRecord {
            release_atomic: 40.0,
            ..DayRecord::default()
        });
        days.push(&DayRecord {
            release_atomic: 20.0,
            ..DayRecord::default()
        });
        assert_eq!(days.len(), 2);
        assert_eq!(days.column("release_atomic"), Some(&[40.0, 20.0][..]));
        assert_eq!(days.columns().len(), DayRecord::field_names().len());
        assert_eq!(days.row(1).map(|r| r.release_atomic), Some(20.0));
    }
}
