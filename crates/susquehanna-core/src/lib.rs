/// susquehanna-core: Conowingo / Muddy Run operations simulator.
///
/// Evaluates radial-basis-function release policies over a two-reservoir
/// hydropower and water-supply system in 4-hour decision steps, and scores
/// the trajectory with supply, environmental, recreation, revenue and
/// equity objectives.
pub mod calendar;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod interpolation;
pub mod metrics;
pub mod model;
pub mod objectives;
pub mod operations;
pub mod policy;
pub mod simulation;
pub mod strategy;
pub mod synthetic;
pub mod tables;
pub mod traits;
pub mod transition;
pub mod units;

pub use config::{DataMode, ModelConfig};
pub use diagnostics::{EvaluationLog, NullSink, VecSink};
pub use error::{ConfigError, SimulationError};
pub use model::SusquehannaModel;
pub use objectives::{ObjectiveSet, ObjectiveVector};
pub use traits::{DiagnosticsSink, EvaluationStrategy};
