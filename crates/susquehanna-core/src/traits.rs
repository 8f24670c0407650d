//! Seams of the evaluation pipeline.
//!
//! An [`EvaluationStrategy`] decides which hydrology traces one `evaluate`
//! call simulates and how the per-trace objectives are combined. A
//! [`DiagnosticsSink`] receives what a caller wants to inspect afterwards;
//! the model itself never keeps state between calls.

use crate::data::{HydrologyRecord, HydrologyTrace};
use crate::diagnostics::EvaluationLog;
use crate::error::ConfigError;

pub trait EvaluationStrategy {
    /// Number of simulations run by one evaluation.
    fn n_runs(&self) -> usize;

    /// Check once, at model construction, that `record` can serve every
    /// evaluation over `n_years`.
    fn validate(&self, record: &HydrologyRecord, n_years: usize) -> Result<(), ConfigError>;

    /// Traces simulated by one evaluation, in run order.
    fn traces<'a>(
        &self,
        record: &'a HydrologyRecord,
        n_years: usize,
    ) -> Result<Vec<HydrologyTrace<'a>>, ConfigError>;

    /// Combine per-run objective values (one row per run, same length) into
    /// one vector.
    fn combine(&self, runs: &[Vec<f64>]) -> Vec<f64>;
}

/// Receives one log per simulated trace.
pub trait DiagnosticsSink {
    fn record(&mut self, log: EvaluationLog);

    /// Whether logs should be built at all.
    fn wants_logs(&self) -> bool {
        true
    }
}
