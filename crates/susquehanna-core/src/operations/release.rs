//! Feasible release resolution at Conowingo.

use crate::data::demand::DailyDemand;
use crate::operations::rules::OperatingRules;
use crate::tables::PhysicalTables;

/// Flows to the four Conowingo users [cfs].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Releases {
    pub atomic: f64,
    pub baltimore: f64,
    pub chester: f64,
    pub downstream: f64,
}

impl Releases {
    pub fn new(atomic: f64, baltimore: f64, chester: f64, downstream: f64) -> Self {
        Self {
            atomic,
            baltimore,
            chester,
            downstream,
        }
    }

    /// Consumptive withdrawals (everything except the downstream release).
    pub fn withdrawals(&self) -> f64 {
        self.atomic + self.baltimore + self.chester
    }

    fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            atomic: f(self.atomic, other.atomic),
            baltimore: f(self.baltimore, other.baltimore),
            chester: f(self.chester, other.chester),
            downstream: f(self.downstream, other.downstream),
        }
    }

    pub(crate) fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub(crate) fn scale(self, k: f64) -> Self {
        self.zip_with(self, |a, _| a * k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseBounds {
    pub min: Releases,
    pub max: Releases,
}

impl ReleaseBounds {
    /// `min(max, max(min, requested))` per user.
    pub fn clamp(&self, requested: Releases) -> Releases {
        let lower = requested.zip_with(self.min, f64::max);
        lower.zip_with(self.max, f64::min)
    }
}

/// Minimum and maximum feasible release of each user at a Conowingo level.
pub fn release_bounds(
    level: f64,
    demand: &DailyDemand,
    rules: &OperatingRules,
    tables: &PhysicalTables,
) -> ReleaseBounds {
    let above = |threshold: f64, value: f64| if level <= threshold { 0.0 } else { value };

    let mut min = Releases::default();
    let mut max = Releases {
        atomic: above(rules.min_level_atomic, demand.atomic),
        baltimore: above(rules.min_level_baltimore, demand.baltimore),
        chester: above(rules.min_level_chester, demand.chester),
        downstream: rules.turbine_capacity,
    };

    if level > rules.spillway_activation {
        max.downstream = rules.turbine_capacity + tables.spillway_max.eval(level).max(0.0);
        min.downstream = tables.spillway_min.eval(level).max(0.0);
    }

    let ladder = &rules.ladder;
    if level < ladder.downstream {
        max.downstream = 0.0;
        min.downstream = 0.0;
    }
    if level < ladder.atomic {
        max.atomic = 0.0;
    }
    if level < ladder.chester {
        max.chester = 0.0;
    }
    if level < ladder.baltimore {
        max.baltimore = 0.0;
    }

    // spillway minimum can never exceed what the structures pass
    min.downstream = min.downstream.min(max.downstream);

    ReleaseBounds { min, max }
}

/// Actual releases for requested targets at a Conowingo level.
pub fn actual_release(
    requested: Releases,
    level: f64,
    demand: &DailyDemand,
    rules: &OperatingRules,
    tables: &PhysicalTables,
) -> Releases {
    release_bounds(level, demand, rules, tables).clamp(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;
    use proptest::prelude::*;

    fn demand() -> DailyDemand {
        DailyDemand {
            atomic: 40.0,
            baltimore: 150.0,
            chester: 30.0,
        }
    }

    #[test]
    fn requests_within_bounds_pass_through() {
        let tables = synthetic::reference_tables().unwrap();
        let rules = OperatingRules::default();
        let req = Releases::new(20.0, 100.0, 10.0, 30_000.0);
        let r = actual_release(req, 108.0, &demand(), &rules, &tables);
        assert_eq!(r, req);
    }

    #[test]
    fn demand_caps_withdrawals() {
        let tables = synthetic::reference_tables().unwrap();
        let rules = OperatingRules::default();
        let req = Releases::new(1000.0, 1000.0, 1000.0, 1.0e6);
        let r = actual_release(req, 108.0, &demand(), &rules, &tables);
        assert_eq!(r.atomic, 40.0);
        assert_eq!(r.baltimore, 150.0);
        assert_eq!(r.chester, 30.0);
        assert_eq!(r.downstream, rules.turbine_capacity);
    }

    #[test]
    fn ladder_applies_independently() {
        let tables = synthetic::reference_tables().unwrap();
        let rules = OperatingRules::default();
        let req = Releases::new(1000.0, 1000.0, 1000.0, 1.0e6);

        let r = actual_release(req, 104.0, &demand(), &rules, &tables);
        assert_eq!(r.downstream, 0.0);
        assert_eq!(r.atomic, 40.0);

        let r = actual_release(req, 101.0, &demand(), &rules, &tables);
        assert_eq!(r.atomic, 0.0);
        assert_eq!(r.chester, 30.0);

        let r = actual_release(req, 95.0, &demand(), &rules, &tables);
        assert_eq!(r.chester, 0.0);
        assert_eq!(r.baltimore, 150.0);

        let r = actual_release(req, 91.0, &demand(), &rules, &tables);
        assert_eq!(r, Releases::default());
    }

    #[test]
    fn minimum_level_is_inclusive() {
        let tables = synthetic::reference_tables().unwrap();
        let rules = OperatingRules::default();
        let req = Releases::new(0.0, 1000.0, 0.0, 0.0);
        let at = actual_release(req, rules.min_level_baltimore, &demand(), &rules, &tables);
        assert_eq!(at.baltimore, 0.0);
    }

    #[test]
    fn spillways_raise_both_bounds() {
        let tables = synthetic::reference_tables().unwrap();
        let rules = OperatingRules::default();
        let level = 112.0;
        let b = release_bounds(level, &demand(), &rules, &tables);
        assert_eq!(
            b.max.downstream,
            rules.turbine_capacity + tables.spillway_max.eval(level)
        );
        assert_eq!(b.min.downstream, tables.spillway_min.eval(level));
        let r = actual_release(Releases::default(), level, &demand(), &rules, &tables);
        assert_eq!(r.downstream, b.min.downstream);
    }

    proptest! {
        #[test]
        fn actual_release_stays_within_bounds(
            level in 80.0f64..120.0,
            a in 0.0f64..500.0,
            b in 0.0f64..500.0,
            c in 0.0f64..500.0,
            d in 0.0f64..2.0e6,
        ) {
            let tables = synthetic::reference_tables().unwrap();
            let rules = OperatingRules::default();
            let bounds = release_bounds(level, &demand(), &rules, &tables);
            let r = bounds.clamp(Releases::new(a, b, c, d));
            for (v, lo, hi) in [
                (r.atomic, bounds.min.atomic, bounds.max.atomic),
                (r.baltimore, bounds.min.baltimore, bounds.max.baltimore),
                (r.chester, bounds.min.chester, bounds.max.chester),
                (r.downstream, bounds.min.downstream, bounds.max.downstream),
            ] {
                prop_assert!(lo <= hi);
                prop_assert!(v >= lo && v <= hi);
            }
            if level < rules.ladder.downstream {
                prop_assert_eq!(r.downstream, 0.0);
            }
        }
    }
}
