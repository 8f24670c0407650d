//! Operating rules: release constraints and pumped-storage scheduling.

pub mod pumped_storage;
pub mod release;
pub mod rules;

pub use pumped_storage::{pumped_storage_flows, PumpedStorageFlows};
pub use release::{actual_release, release_bounds, ReleaseBounds, Releases};
pub use rules::{
    CurtailmentLadder, DaySchedule, HourWindow, OperatingRules, PumpedStorageRules,
    ScheduledOperation, WeeklySchedule,
};
