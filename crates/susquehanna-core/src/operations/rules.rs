//! Operating thresholds and the Muddy Run weekly schedule.
//!
//! Defaults reproduce the reference Conowingo / Muddy Run operating rules.
//! All levels are in ft, flows in cfs.

use serde::{Deserialize, Serialize};

use crate::calendar::{DAYS_PER_WEEK, HOURS_PER_DAY};
use crate::error::ConfigError;

/// Levels below which a user's maximum release is forced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurtailmentLadder {
    pub downstream: f64,
    pub atomic: f64,
    pub chester: f64,
    pub baltimore: f64,
}

impl Default for CurtailmentLadder {
    fn default() -> Self {
        Self {
            downstream: 105.5,
            atomic: 103.5,
            chester: 100.5,
            baltimore: 91.5,
        }
    }
}

/// Inclusive range of hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: usize,
    pub end: usize,
}

impl HourWindow {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: usize) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySchedule {
    pub pump: Vec<HourWindow>,
    pub turbine: Vec<HourWindow>,
}

/// Operation requested by the schedule for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduledOperation {
    pub pump: bool,
    pub turbine: bool,
}

/// Pumping and generation windows, one entry per weekday starting on Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub days: Vec<DaySchedule>,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        let peak = vec![HourWindow::new(7, 11), HourWindow::new(17, 20)];
        let weekday = DaySchedule {
            pump: vec![HourWindow::new(0, 6), HourWindow::new(21, 23)],
            turbine: peak.clone(),
        };
        let sunday = DaySchedule {
            pump: vec![HourWindow::new(0, 4), HourWindow::new(22, 23)],
            turbine: Vec::new(),
        };
        let friday = DaySchedule {
            pump: Vec::new(),
            turbine: peak,
        };
        let saturday = DaySchedule {
            pump: vec![HourWindow::new(0, 6), HourWindow::new(22, 23)],
            turbine: Vec::new(),
        };
        Self {
            days: vec![
                sunday,
                weekday.clone(),
                weekday.clone(),
                weekday.clone(),
                weekday,
                friday,
                saturday,
            ],
        }
    }
}

impl WeeklySchedule {
    pub fn operation(&self, day_of_week: usize, hour: usize) -> ScheduledOperation {
        match self.days.get(day_of_week % DAYS_PER_WEEK) {
            Some(day) => ScheduledOperation {
                pump: day.pump.iter().any(|w| w.contains(hour)),
                turbine: day.turbine.iter().any(|w| w.contains(hour)),
            },
            None => ScheduledOperation::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days.len() != DAYS_PER_WEEK {
            return Err(ConfigError::DimensionMismatch {
                name: "pumped storage schedule days".to_string(),
                expected: DAYS_PER_WEEK,
                actual: self.days.len(),
            });
        }
        for (d, day) in self.days.iter().enumerate() {
            for w in day.pump.iter().chain(&day.turbine) {
                if w.start > w.end || w.end >= HOURS_PER_DAY {
                    return Err(ConfigError::InvalidParameter(format!(
                        "schedule day {d}: invalid hour window {}..={}",
                        w.start, w.end
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpedStorageRules {
    /// Pumping flow when scheduled [cfs].
    pub pump_flow: f64,
    /// Maximum generating flow [cfs].
    pub turbine_flow: f64,
    /// Conowingo level below which pumping stops (cavitation) [ft].
    pub cavitation_level: f64,
    /// Muddy Run dead-storage level [ft].
    pub dead_level: f64,
    pub schedule: WeeklySchedule,
}

impl Default for PumpedStorageRules {
    fn default() -> Self {
        Self {
            pump_flow: 24_800.0,
            turbine_flow: 32_000.0,
            cavitation_level: 104.7,
            dead_level: 470.0,
            schedule: WeeklySchedule::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingRules {
    /// Total Conowingo turbine capacity [cfs].
    pub turbine_capacity: f64,
    pub min_level_chester: f64,
    pub min_level_atomic: f64,
    pub min_level_baltimore: f64,
    /// Level above which the spillways are operated [ft].
    pub spillway_activation: f64,
    pub ladder: CurtailmentLadder,
    /// Constant seepage out of Conowingo [cfs].
    pub leak: f64,
    /// Hours integrated between two policy decisions.
    pub hours_per_decision: usize,
    pub pumped_storage: PumpedStorageRules,
}

impl Default for OperatingRules {
    fn default() -> Self {
        Self {
            turbine_capacity: 85_412.0,
            min_level_chester: 99.8,
            min_level_atomic: 98.5,
            min_level_baltimore: 90.8,
            spillway_activation: 110.2,
            ladder: CurtailmentLadder::default(),
            leak: 800.0,
            hours_per_decision: 4,
            pumped_storage: PumpedStorageRules::default(),
        }
    }
}

impl OperatingRules {
    pub fn decisions_per_day(&self) -> usize {
        HOURS_PER_DAY / self.hours_per_decision
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hours_per_decision == 0 || HOURS_PER_DAY % self.hours_per_decision != 0 {
            return Err(ConfigError::InvalidParameter(format!(
                "hours_per_decision must divide 24, got {}",
                self.hours_per_decision
            )));
        }
        let flows = [
            ("turbine_capacity", self.turbine_capacity),
            ("leak", self.leak),
            ("pump_flow", self.pumped_storage.pump_flow),
            ("turbine_flow", self.pumped_storage.turbine_flow),
        ];
        for (name, value) in flows {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter(format!(
                    "{name} must be a non-negative flow, got {value}"
                )));
            }
        }
        let levels = [
            self.min_level_chester,
            self.min_level_atomic,
            self.min_level_baltimore,
            self.spillway_activation,
            self.ladder.downstream,
            self.ladder.atomic,
            self.ladder.chester,
            self.ladder.baltimore,
            self.pumped_storage.cavitation_level,
            self.pumped_storage.dead_level,
        ];
        if levels.iter().any(|l| !l.is_finite()) {
            return Err(ConfigError::InvalidParameter(
                "operating levels must be finite".to_string(),
            ));
        }
        self.pumped_storage.schedule.validate()
    }
}
