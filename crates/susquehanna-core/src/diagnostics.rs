//! Per-evaluation diagnostics handed to a caller-owned sink.

use crate::objectives::{Aggregation, EquityMeasures, MonthlyEquity};
use crate::simulation::DayRecordSeries;
use crate::traits::DiagnosticsSink;

/// Trajectory and equity breakdown of one simulated trace.
#[derive(Debug, Clone)]
pub struct EvaluationLog {
    /// Run index within the evaluation.
    pub run: usize,
    /// First year of the hydrology trace.
    pub first_year: usize,
    /// Daily levels, storages, releases and hydropower.
    pub days: DayRecordSeries,
    pub aggregation: Aggregation,
}

impl EvaluationLog {
    pub fn monthly_equity(&self) -> &MonthlyEquity {
        &self.aggregation.monthly
    }

    pub fn equity(&self) -> &EquityMeasures {
        &self.aggregation.equity
    }
}

/// Append-only in-memory sink.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    logs: Vec<EvaluationLog>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> &[EvaluationLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn into_logs(self) -> Vec<EvaluationLog> {
        self.logs
    }
}

impl DiagnosticsSink for VecSink {
    fn record(&mut self, log: EvaluationLog) {
        self.logs.push(log);
    }
}

/// Sink that drops every log.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&mut self, _log: EvaluationLog) {}

    fn wants_logs(&self) -> bool {
        false
    }
}
