use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::convert::{as_slice, value_error};

use susquehanna_core::metrics;

/// Gini coefficient of a vector of objective values.
#[pyfunction]
fn gini<'py>(values: PyReadonlyArray1<'py, f64>) -> PyResult<f64> {
    metrics::gini(as_slice(&values, "values")?).map_err(value_error)
}

/// Summed pairwise distance of a vector of objective values.
#[pyfunction]
fn euclidean<'py>(values: PyReadonlyArray1<'py, f64>) -> PyResult<f64> {
    Ok(metrics::euclidean(as_slice(&values, "values")?))
}

/// Calendar-month means of a daily series starting on January 1st.
#[pyfunction]
fn monthly_average<'py>(
    py: Python<'py>,
    daily: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let monthly = metrics::monthly_average(as_slice(&daily, "daily")?);
    Ok(PyArray1::from_slice(py, &monthly))
}

/// Percentile `q` in [0, 100] with linear interpolation.
#[pyfunction]
fn percentile<'py>(values: PyReadonlyArray1<'py, f64>, q: f64) -> PyResult<f64> {
    Ok(metrics::percentile(as_slice(&values, "values")?, q))
}

/// `equity` submodule: the aggregation metrics on plain numpy arrays.
pub fn module(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let m = PyModule::new(py, "equity")?;
    m.add_function(wrap_pyfunction!(gini, &m)?)?;
    m.add_function(wrap_pyfunction!(euclidean, &m)?)?;
    m.add_function(wrap_pyfunction!(monthly_average, &m)?)?;
    m.add_function(wrap_pyfunction!(percentile, &m)?)?;
    Ok(m)
}
