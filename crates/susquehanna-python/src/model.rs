use std::path::PathBuf;

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::convert::{decision_vector, value_error};

use susquehanna_core::objectives::EquityMeasures;
use susquehanna_core::synthetic;
use susquehanna_core::{EvaluationLog, ModelConfig, SusquehannaModel, VecSink};

/// Yearly equity measures of one simulated trace.
#[pyclass(frozen, get_all)]
pub struct Equity {
    pub energy_reliability: f64,
    pub gini_yearly: f64,
    pub euclidean_yearly: f64,
    pub gini_monthly_std: f64,
    pub euclidean_monthly_std: f64,
    pub gini_ratio: f64,
    pub euclidean_ratio: f64,
}

impl From<&EquityMeasures> for Equity {
    fn from(e: &EquityMeasures) -> Self {
        Self {
            energy_reliability: e.energy_reliability,
            gini_yearly: e.gini_yearly,
            euclidean_yearly: e.euclidean_yearly,
            gini_monthly_std: e.gini_monthly_std,
            euclidean_monthly_std: e.euclidean_monthly_std,
            gini_ratio: e.gini_ratio,
            euclidean_ratio: e.euclidean_ratio,
        }
    }
}

#[pymethods]
impl Equity {
    fn __repr__(&self) -> String {
        format!(
            "Equity(gini_yearly={:.4}, gini_ratio={:.4}, \
             euclidean_yearly={:.4}, euclidean_ratio={:.4})",
            self.gini_yearly, self.gini_ratio, self.euclidean_yearly, self.euclidean_ratio
        )
    }
}

/// One log as a dict; the daily trajectory maps column names to arrays.
fn log_to_dict<'py>(py: Python<'py>, log: &EvaluationLog) -> PyResult<Bound<'py, PyDict>> {
    let trajectory = PyDict::new(py);
    for (name, column) in log.days.columns() {
        trajectory.set_item(name, PyArray1::from_slice(py, column))?;
    }
    let monthly = log.monthly_equity();

    let dict = PyDict::new(py);
    dict.set_item("run", log.run)?;
    dict.set_item("first_year", log.first_year)?;
    dict.set_item("gini_monthly", PyArray1::from_slice(py, &monthly.gini))?;
    dict.set_item("euclidean_monthly", PyArray1::from_slice(py, &monthly.euclidean))?;
    dict.set_item("equity", Equity::from(log.equity()))?;
    dict.set_item("trajectory", trajectory)?;
    Ok(dict)
}

/// Immutable policy evaluator. Safe to share between Python threads.
#[pyclass(frozen, name = "SusquehannaModel")]
pub struct PySusquehannaModel {
    inner: SusquehannaModel,
}

#[pymethods]
impl PySusquehannaModel {
    /// Build from an optional TOML configuration and an optional data
    /// directory; without a directory a synthetic record of
    /// `synthetic_years` years is generated from `seed`. `diagnostics`
    /// overrides the configured flag.
    #[new]
    #[pyo3(signature = (
        config_path=None,
        data_dir=None,
        synthetic_years=10,
        seed=42,
        diagnostics=None,
    ))]
    fn new(
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        synthetic_years: usize,
        seed: u64,
        diagnostics: Option<bool>,
    ) -> PyResult<Self> {
        let mut config = match config_path {
            Some(path) => ModelConfig::from_file(&path).map_err(value_error)?,
            None => ModelConfig::default(),
        };
        if let Some(flag) = diagnostics {
            config.diagnostics = flag;
        }
        let inner = match data_dir {
            Some(dir) => SusquehannaModel::from_directory(config, &dir),
            None => synthetic::reference_system(synthetic_years, seed)
                .and_then(|data| SusquehannaModel::new(config, data)),
        }
        .map_err(value_error)?;
        Ok(Self { inner })
    }

    #[getter]
    fn n_decision_vars(&self) -> usize {
        self.inner.n_decision_vars()
    }

    #[getter]
    fn n_objectives(&self) -> usize {
        self.inner.n_objectives()
    }

    #[getter]
    fn objective_names(&self) -> Vec<&'static str> {
        self.inner.objective_names().to_vec()
    }

    #[getter]
    fn diagnostics(&self) -> bool {
        self.inner.config().diagnostics
    }

    /// `(lower, upper)` bounds of the decision vector.
    fn bounds<'py>(
        &self,
        py: Python<'py>,
    ) -> (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>) {
        let (lower, upper): (Vec<f64>, Vec<f64>) =
            self.inner.decision_bounds().into_iter().unzip();
        (PyArray1::from_vec(py, lower), PyArray1::from_vec(py, upper))
    }

    /// Objective values of a decision vector. The GIL is released while
    /// simulating.
    fn evaluate<'py>(
        &self,
        py: Python<'py>,
        decision_vars: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let vars = decision_vector(&decision_vars, self.inner.n_decision_vars())?;
        let objectives = py
            .allow_threads(|| self.inner.evaluate(&vars))
            .map_err(value_error)?;
        Ok(PyArray1::from_vec(py, objectives.to_vec()))
    }

    /// Objective values plus one dict per simulated trace. The list is
    /// empty unless the model was built with diagnostics enabled.
    fn evaluate_logged<'py>(
        &self,
        py: Python<'py>,
        decision_vars: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyList>)> {
        let vars = decision_vector(&decision_vars, self.inner.n_decision_vars())?;
        let (objectives, sink) = py
            .allow_threads(|| {
                let mut sink = VecSink::new();
                self.inner
                    .evaluate_with_sink(&vars, &mut sink)
                    .map(|o| (o, sink))
            })
            .map_err(value_error)?;

        let logs = PyList::empty(py);
        for log in sink.logs() {
            logs.append(log_to_dict(py, log)?)?;
        }
        Ok((PyArray1::from_vec(py, objectives.to_vec()), logs))
    }
}

/// `model` submodule holding the evaluator and its result classes.
pub fn module(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let m = PyModule::new(py, "model")?;
    m.add_class::<PySusquehannaModel>()?;
    m.add_class::<Equity>()?;
    Ok(m)
}
