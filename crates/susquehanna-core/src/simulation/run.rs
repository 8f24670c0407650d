/// Daily / yearly simulation loop.
///
/// - `simulate()`: run a release policy over the horizon of a hydrology trace
///
/// Each day runs `decisions_per_day` transition steps; the policy is queried
/// once per step with the decision index within the year and the current
/// Conowingo level.
use tracing::trace;

use super::state::SystemState;
use super::trajectory::{DayRecord, DayRecordSeries};
use crate::calendar::{HorizonClock, DAYS_PER_YEAR};
use crate::data::{DemandSeries, HydrologyTrace};
use crate::operations::{PumpedStorageFlows, Releases};
use crate::policy::ReleasePolicy;
use crate::transition::{step, HydropowerOutput, StepCalendar, StepContext, StepForcing};

/// Inputs of one simulation run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationInputs<'a> {
    pub context: StepContext<'a>,
    pub demands: &'a DemandSeries,
    pub hydrology: HydrologyTrace<'a>,
    /// Day of week of the first simulated day (0 = Sunday).
    pub first_weekday: usize,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub days: DayRecordSeries,
    pub final_state: SystemState,
    pub n_years: usize,
}

pub fn simulate(
    policy: &ReleasePolicy,
    initial: SystemState,
    inputs: &SimulationInputs<'_>,
) -> SimulationResult {
    let n_years = inputs.hydrology.n_years();
    let decisions_per_day = inputs.context.rules.decisions_per_day();
    let steps_per_year = DAYS_PER_YEAR * decisions_per_day;

    let clock = HorizonClock::new(n_years, inputs.first_weekday);
    let mut days = DayRecordSeries::with_capacity(clock.n_days());
    let mut state = initial;

    for day in clock {
        if day.day_of_year == 0 {
            trace!(year = day.year, level = state.conowingo.level(), "simulating year");
        }
        let forcing = StepForcing {
            hydrology: inputs.hydrology.day(day.year, day.day_of_year),
            demand: inputs.demands.day(day.day_of_year),
        };
        let start = state;
        let mut releases = Releases::default();
        let mut pump = 0.0;
        let mut turbine = 0.0;
        let mut hydropower = HydropowerOutput::default();

        for j in 0..decisions_per_day {
            let step_of_year = (day.index * decisions_per_day + j) % steps_per_year;
            let requested = policy.decide(step_of_year, state.conowingo.level());
            let calendar = StepCalendar {
                day_of_year: day.day_of_year,
                day_of_week: day.day_of_week,
                step_of_day: j,
            };
            let outcome = step(&state, requested, &forcing, &calendar, &inputs.context);

            releases = releases.add(outcome.releases);
            pump += outcome.pumped.pump;
            turbine += outcome.pumped.turbine;
            hydropower.accumulate(&outcome.hydropower);
            state = outcome.state;
        }

        let n = decisions_per_day as f64;
        let pumped = PumpedStorageFlows {
            pump: pump / n,
            turbine: turbine / n,
        };
        days.push(&DayRecord::new(&start, releases.scale(1.0 / n), pumped, &hydropower));
    }

    SimulationResult {
        days,
        final_state: state,
        n_years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperatingRules;
    use crate::policy::{PolicyScaling, RbfPolicy, RbfShape};
    use crate::synthetic;

    #[test]
    fn one_year_fills_every_day() {
        let system = synthetic::reference_system(2, 7).unwrap();
        let rules = OperatingRules::default();
        let shape = RbfShape::default();
        let rbf = RbfPolicy::from_decision_vars(shape, &vec![0.0; shape.n_params()]).unwrap();
        let policy = ReleasePolicy::new(rbf, PolicyScaling::new(&system.demands, &rules)).unwrap();
        let inputs = SimulationInputs {
            context: StepContext {
                tables: &system.tables,
                rules: &rules,
                prices: &system.prices,
            },
            demands: &system.demands,
            hydrology: system.hydrology.trace(0, 1).unwrap(),
            first_weekday: 5,
        };
        let initial = SystemState::from_levels(&system.tables, 108.5, 505.0);
        let result = simulate(&policy, initial, &inputs);

        assert_eq!(result.days.len(), DAYS_PER_YEAR);
        assert_eq!(result.n_years, 1);
        assert_eq!(result.days.level_conowingo[0], 108.5);
        assert!(result.days.level_conowingo.iter().all(|l| l.is_finite()));
        assert!(result.final_state.conowingo.level().is_finite());
        assert!(result.days.conowingo_revenue.iter().all(|&r| r >= 0.0));
    }
}
