//! Policy evaluation entry point.
//!
//! A [`SusquehannaModel`] owns the reference data and configuration and is
//! never mutated after construction, so one instance can serve concurrent
//! evaluations from several threads.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::data::{load_system, HydrologyTrace, SystemData};
use crate::diagnostics::{EvaluationLog, NullSink};
use crate::error::{ConfigError, SimulationError};
use crate::objectives::{aggregate, ObjectiveSet, ObjectiveVector};
use crate::policy::{PolicyScaling, RbfPolicy, ReleasePolicy, POLICY_INPUTS, POLICY_OUTPUTS};
use crate::simulation::{simulate, SimulationInputs, SimulationResult, SystemState};
use crate::strategy::Strategy;
use crate::traits::{DiagnosticsSink, EvaluationStrategy};
use crate::transition::StepContext;

/// Below this many Monte Carlo samples a high percentile is mostly the
/// sample maximum.
const FEW_SAMPLES: usize = 10;

#[derive(Debug, Clone)]
pub struct SusquehannaModel {
    config: ModelConfig,
    data: SystemData,
    strategy: Strategy,
    scaling: PolicyScaling,
    initial: SystemState,
}

fn check_level(name: &str, level: f64, domain: (f64, f64)) -> Result<(), ConfigError> {
    if level < domain.0 || level > domain.1 {
        return Err(ConfigError::InvalidParameter(format!(
            "{name} {level} ft is outside the table range [{}, {}]",
            domain.0, domain.1
        )));
    }
    Ok(())
}

impl SusquehannaModel {
    /// Validates the configuration against the data; nothing is simulated.
    pub fn new(config: ModelConfig, data: SystemData) -> Result<Self, ConfigError> {
        config.validate()?;
        let shape = config.rbf;
        if shape.n_inputs != POLICY_INPUTS || shape.n_outputs != POLICY_OUTPUTS {
            return Err(ConfigError::InvalidParameter(format!(
                "rbf shape must have {POLICY_INPUTS} inputs and {POLICY_OUTPUTS} outputs, \
                 got {shape:?}"
            )));
        }
        check_level(
            "initial_level_conowingo",
            config.initial_level_conowingo,
            data.tables.conowingo.level_domain(),
        )?;
        check_level(
            "initial_level_muddy_run",
            config.initial_level_muddy_run,
            data.tables.muddy_run.level_domain(),
        )?;

        let strategy = Strategy::from(config.data_mode);
        strategy.validate(&data.hydrology, config.n_years)?;
        if let Strategy::MonteCarlo {
            n_samples,
            percentile,
            ..
        } = strategy
        {
            if n_samples < FEW_SAMPLES {
                warn!(
                    n_samples,
                    percentile,
                    "few Monte Carlo samples, the percentile is close to the sample extreme"
                );
            }
        }

        let scaling = PolicyScaling::new(&data.demands, &config.rules);
        let initial = SystemState::from_levels(
            &data.tables,
            config.initial_level_conowingo,
            config.initial_level_muddy_run,
        );

        info!(
            n_years = config.n_years,
            record_years = data.hydrology.n_years(),
            n_runs = strategy.n_runs(),
            n_decision_vars = shape.n_params(),
            objectives = ?config.objectives,
            "built susquehanna model"
        );

        Ok(Self {
            config,
            data,
            strategy,
            scaling,
            initial,
        })
    }

    /// Load the data set below `root` with the layout of `config`.
    pub fn from_directory(config: ModelConfig, root: &Path) -> Result<Self, ConfigError> {
        let data = load_system(root, &config.layout, config.data_mode.hydrology_source())?;
        Self::new(config, data)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn data(&self) -> &SystemData {
        &self.data
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn n_decision_vars(&self) -> usize {
        self.config.rbf.n_params()
    }

    pub fn decision_bounds(&self) -> Vec<(f64, f64)> {
        self.config.rbf.bounds()
    }

    pub fn n_objectives(&self) -> usize {
        self.config.objectives.count()
    }

    pub fn objective_names(&self) -> &'static [&'static str] {
        self.config.objectives.names()
    }

    /// Decode a decision vector into a release policy.
    pub fn policy(&self, decision_vars: &[f64]) -> Result<ReleasePolicy, ConfigError> {
        let rbf = RbfPolicy::from_decision_vars(self.config.rbf, decision_vars)?;
        ReleasePolicy::new(rbf, self.scaling)
    }

    fn run(&self, policy: &ReleasePolicy, hydrology: HydrologyTrace<'_>) -> SimulationResult {
        let inputs = SimulationInputs {
            context: StepContext {
                tables: &self.data.tables,
                rules: &self.config.rules,
                prices: &self.data.prices,
            },
            demands: &self.data.demands,
            hydrology,
            first_weekday: self.config.first_weekday,
        };
        simulate(policy, self.initial, &inputs)
    }

    /// Simulate the first trace of the configured strategy without
    /// aggregating objectives.
    pub fn simulate(&self, decision_vars: &[f64]) -> Result<SimulationResult, ConfigError> {
        let policy = self.policy(decision_vars)?;
        let traces = self.strategy.traces(&self.data.hydrology, self.config.n_years)?;
        let trace = traces
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::InvalidParameter("no hydrology trace".to_string()))?;
        Ok(self.run(&policy, trace))
    }

    /// Objective values of a decision vector.
    pub fn evaluate(&self, decision_vars: &[f64]) -> Result<ObjectiveVector, SimulationError> {
        self.evaluate_with_sink(decision_vars, &mut NullSink)
    }

    /// Like [`evaluate`](Self::evaluate), also sending one
    /// [`EvaluationLog`] per simulated trace to `sink` when
    /// `diagnostics` is enabled. Logs are only recorded when the whole
    /// evaluation succeeds.
    pub fn evaluate_with_sink(
        &self,
        decision_vars: &[f64],
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<ObjectiveVector, SimulationError> {
        let policy = self.policy(decision_vars)?;
        let traces = self.strategy.traces(&self.data.hydrology, self.config.n_years)?;
        let set = self.config.objectives;
        let keep_logs = self.config.diagnostics && sink.wants_logs();
        let with_equity = set == ObjectiveSet::Extended || self.config.diagnostics;

        let mut runs = Vec::with_capacity(traces.len());
        let mut logs = Vec::new();
        for (run, trace) in traces.into_iter().enumerate() {
            let result = self.run(&policy, trace);
            let aggregation = aggregate(
                &result,
                &self.data.demands,
                &self.config.energy_target,
                with_equity,
            )?;
            if self.config.diagnostics {
                debug!(
                    run,
                    first_year = trace.first_year(),
                    gini_monthly = ?aggregation.monthly.gini,
                    euclidean_monthly = ?aggregation.monthly.euclidean,
                    gini_ratio = aggregation.equity.gini_ratio,
                    euclidean_ratio = aggregation.equity.euclidean_ratio,
                    "run equity"
                );
            }
            runs.push(aggregation.values(set));
            if keep_logs {
                logs.push(EvaluationLog {
                    run,
                    first_year: trace.first_year(),
                    days: result.days,
                    aggregation,
                });
            }
        }

        let objectives = ObjectiveVector::new(set, self.strategy.combine(&runs))?;
        for log in logs {
            sink.record(log);
        }
        debug!(objectives = ?objectives.as_slice(), "evaluated policy");
        Ok(objectives)
    }
}
