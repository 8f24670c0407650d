//! Reservoir state, daily trajectories and the simulation loop.

pub mod run;
pub mod state;
pub mod trajectory;

pub use run::{simulate, SimulationInputs, SimulationResult};
pub use state::{ReservoirState, SystemState};
pub use trajectory::{DayRecord, DayRecordSeries};
