//! One decision step of the two-reservoir system.
//!
//! A decision step integrates `hours_per_decision` hourly mass balances with
//! the release request held fixed. Each hour:
//!
//! 1. levels from storages
//! 2. Muddy Run pump / generate from the weekly schedule
//! 3. feasible Conowingo releases
//! 4. evaporation from both lake surfaces
//! 5. mass balance of both reservoirs
//! 6. hydropower of both plants

use smallvec::SmallVec;

use super::hydropower::{conowingo_hour, muddy_run_hour, HydropowerOutput};
use crate::data::{DailyDemand, DailyHydrology, PriceMatrix};
use crate::operations::{
    actual_release, pumped_storage_flows, OperatingRules, PumpedStorageFlows, Releases,
};
use crate::simulation::state::SystemState;
use crate::tables::PhysicalTables;
use crate::units;

/// Length of one integration step [s].
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Read-only inputs shared by every step of an evaluation.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub tables: &'a PhysicalTables,
    pub rules: &'a OperatingRules,
    pub prices: &'a PriceMatrix,
}

#[derive(Debug, Clone, Copy)]
pub struct StepForcing {
    pub hydrology: DailyHydrology,
    pub demand: DailyDemand,
}

#[derive(Debug, Clone, Copy)]
pub struct StepCalendar {
    pub day_of_year: usize,
    pub day_of_week: usize,
    /// Index of the decision step within the day.
    pub step_of_day: usize,
}

/// Flows entering and leaving the reservoirs during one hour [cfs].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourlyFlows {
    pub inflow: f64,
    pub lateral_inflow: f64,
    pub muddy_run_inflow: f64,
    pub releases: Releases,
    pub pumped: PumpedStorageFlows,
    pub evaporation_conowingo: f64,
    pub evaporation_muddy_run: f64,
    pub leak: f64,
}

/// New `(conowingo, muddy_run)` storages [ft^3] after `dt` seconds.
pub fn mass_balance(
    storage_conowingo: f64,
    storage_muddy_run: f64,
    f: &HourlyFlows,
    dt: f64,
) -> (f64, f64) {
    let muddy_run = storage_muddy_run
        + dt * (f.pumped.pump - f.pumped.turbine + f.muddy_run_inflow - f.evaporation_muddy_run);
    let conowingo = storage_conowingo
        + dt * (f.inflow + f.lateral_inflow
            - f.releases.downstream
            - f.releases.withdrawals()
            - f.evaporation_conowingo
            + f.pumped.net_to_conowingo()
            - f.leak);
    (conowingo, muddy_run)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: SystemState,
    /// Mean releases over the step.
    pub releases: Releases,
    /// Mean pumped-storage flows over the step.
    pub pumped: PumpedStorageFlows,
    pub hydropower: HydropowerOutput,
}

/// Advance both reservoirs by one decision step.
pub fn step(
    state: &SystemState,
    requested: Releases,
    forcing: &StepForcing,
    calendar: &StepCalendar,
    ctx: &StepContext<'_>,
) -> StepOutcome {
    let StepContext {
        tables,
        rules,
        prices,
    } = *ctx;
    let hours = rules.hours_per_decision;
    let first_hour = hours * calendar.step_of_day;
    let hydro = &forcing.hydrology;

    let mut current = *state;
    let mut releases: SmallVec<[Releases; 8]> = SmallVec::with_capacity(hours);
    let mut pumped: SmallVec<[PumpedStorageFlows; 8]> = SmallVec::with_capacity(hours);
    let mut hydropower = HydropowerOutput::default();

    for hour in first_hour..first_hour + hours {
        let level_co = current.conowingo.level();
        let level_mr = current.muddy_run.level();

        let transfer = pumped_storage_flows(
            &rules.pumped_storage,
            &tables.muddy_run,
            calendar.day_of_week,
            hour,
            level_co,
            level_mr,
        );
        let actual = actual_release(requested, level_co, &forcing.demand, rules, tables);

        let flows = HourlyFlows {
            inflow: hydro.inflow,
            lateral_inflow: hydro.lateral_inflow,
            muddy_run_inflow: hydro.muddy_run_inflow,
            releases: actual,
            pumped: transfer,
            evaporation_conowingo: units::evaporation_flow(
                hydro.evaporation_conowingo,
                tables.conowingo.level_to_surface(level_co),
            ),
            evaporation_muddy_run: units::evaporation_flow(
                hydro.evaporation_muddy_run,
                tables.muddy_run.level_to_surface(level_mr),
            ),
            leak: rules.leak,
        };
        let (s_co, s_mr) = mass_balance(
            current.conowingo.storage(),
            current.muddy_run.storage(),
            &flows,
            SECONDS_PER_HOUR,
        );

        let price = prices.price(hour, calendar.day_of_year);
        let (energy, revenue) = conowingo_hour(tables, actual.downstream, level_co, price);
        hydropower.accumulate(&HydropowerOutput {
            conowingo_energy: energy,
            conowingo_revenue: revenue,
            ..HydropowerOutput::default()
        });
        hydropower.accumulate(&muddy_run_hour(
            &tables.muddy_run_units,
            &transfer,
            level_co,
            level_mr,
            price,
        ));

        releases.push(actual);
        pumped.push(transfer);
        current = SystemState::from_storages(tables, s_co, s_mr);
    }

    let n = hours as f64;
    let mean_releases = releases
        .iter()
        .fold(Releases::default(), |acc, r| acc.add(*r))
        .scale(1.0 / n);
    let mean_pumped = PumpedStorageFlows {
        pump: pumped.iter().map(|p| p.pump).sum::<f64>() / n,
        turbine: pumped.iter().map(|p| p.turbine).sum::<f64>() / n,
    };

    StepOutcome {
        state: current,
        releases: mean_releases,
        pumped: mean_pumped,
        hydropower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;
    use approx::assert_relative_eq;

    #[test]
    fn zero_flows_conserve_storage() {
        let f = HourlyFlows::default();
        let (co, mr) = mass_balance(1.0e10, 5.0e8, &f, SECONDS_PER_HOUR);
        assert_eq!(co, 1.0e10);
        assert_eq!(mr, 5.0e8);
    }

    #[test]
    fn pumping_moves_water_between_lakes() {
        let f = HourlyFlows {
            pumped: PumpedStorageFlows {
                pump: 1000.0,
                turbine: 0.0,
            },
            ..HourlyFlows::default()
        };
        let (co, mr) = mass_balance(1.0e10, 5.0e8, &f, SECONDS_PER_HOUR);
        assert_relative_eq!(co, 1.0e10 - 3.6e6);
        assert_relative_eq!(mr, 5.0e8 + 3.6e6);
        // total volume is unchanged
        assert_relative_eq!(co + mr, 1.0e10 + 5.0e8);
    }

    #[test]
    fn known_conowingo_balance() {
        let f = HourlyFlows {
            inflow: 40_000.0,
            lateral_inflow: 1000.0,
            releases: Releases::new(40.0, 150.0, 30.0, 20_000.0),
            evaporation_conowingo: 100.0,
            leak: 800.0,
            ..HourlyFlows::default()
        };
        let (co, _) = mass_balance(0.0, 0.0, &f, SECONDS_PER_HOUR);
        let net = 40_000.0 + 1000.0 - 20_000.0 - 220.0 - 100.0 - 800.0;
        assert_relative_eq!(co, net * 3600.0);
    }

    fn quiet_system() -> (PhysicalTables, OperatingRules, PriceMatrix) {
        let tables = synthetic::reference_tables().unwrap();
        let mut rules = OperatingRules::default();
        rules.leak = 0.0;
        for day in rules.pumped_storage.schedule.days.iter_mut() {
            day.pump.clear();
            day.turbine.clear();
        }
        let prices = PriceMatrix::new(vec![vec![30.0; 365]; 24]).unwrap();
        (tables, rules, prices)
    }

    #[test]
    fn step_with_no_flows_keeps_state() {
        let (tables, rules, prices) = quiet_system();
        let ctx = StepContext {
            tables: &tables,
            rules: &rules,
            prices: &prices,
        };
        let state = SystemState::from_levels(&tables, 108.5, 505.0);
        let forcing = StepForcing {
            hydrology: DailyHydrology::default(),
            demand: DailyDemand::default(),
        };
        let calendar = StepCalendar {
            day_of_year: 100,
            day_of_week: 2,
            step_of_day: 3,
        };
        let out = step(&state, Releases::default(), &forcing, &calendar, &ctx);
        assert_relative_eq!(out.state.conowingo.storage(), state.conowingo.storage());
        assert_relative_eq!(out.state.muddy_run.storage(), state.muddy_run.storage());
        assert_eq!(out.hydropower, HydropowerOutput::default());
    }

    #[test]
    fn step_means_and_revenue() {
        let (tables, rules, prices) = quiet_system();
        let ctx = StepContext {
            tables: &tables,
            rules: &rules,
            prices: &prices,
        };
        let state = SystemState::from_levels(&tables, 108.5, 505.0);
        let forcing = StepForcing {
            hydrology: DailyHydrology {
                inflow: 20_000.0,
                ..DailyHydrology::default()
            },
            demand: DailyDemand {
                atomic: 40.0,
                baltimore: 150.0,
                chester: 30.0,
            },
        };
        let calendar = StepCalendar {
            day_of_year: 10,
            day_of_week: 3,
            step_of_day: 0,
        };
        let requested = Releases::new(40.0, 150.0, 30.0, 20_000.0);
        let out = step(&state, requested, &forcing, &calendar, &ctx);
        assert_relative_eq!(out.releases.downstream, 20_000.0);
        assert_relative_eq!(out.releases.withdrawals(), 220.0);
        // net loss is the withdrawals over four hours
        let expected = state.conowingo.storage() - 220.0 * 4.0 * 3600.0;
        assert_relative_eq!(out.state.conowingo.storage(), expected, max_relative = 1e-12);
        assert!(out.hydropower.conowingo_energy > 0.0);
        assert_relative_eq!(
            out.hydropower.conowingo_revenue,
            out.hydropower.conowingo_energy / 1000.0 * 30.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn scheduled_pumping_runs_inside_step() {
        let tables = synthetic::reference_tables().unwrap();
        let rules = OperatingRules::default();
        let prices = PriceMatrix::new(vec![vec![30.0; 365]; 24]).unwrap();
        let ctx = StepContext {
            tables: &tables,
            rules: &rules,
            prices: &prices,
        };
        let state = SystemState::from_levels(&tables, 108.5, 500.0);
        let forcing = StepForcing {
            hydrology: DailyHydrology::default(),
            demand: DailyDemand::default(),
        };
        // Monday 00:00 to 04:00 is a pumping window
        let calendar = StepCalendar {
            day_of_year: 0,
            day_of_week: 1,
            step_of_day: 0,
        };
        let out = step(&state, Releases::default(), &forcing, &calendar, &ctx);
        assert_relative_eq!(out.pumped.pump, 24_800.0);
        assert!(out.state.muddy_run.storage() > state.muddy_run.storage());
        assert!(out.hydropower.muddy_run_pump_energy > 0.0);
    }
}
