//! Sub-daily state transition and hydropower accounting.

pub mod hydropower;
pub mod step;

pub use hydropower::HydropowerOutput;
pub use step::{
    mass_balance, step, HourlyFlows, StepCalendar, StepContext, StepForcing, StepOutcome,
};
