use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Borrow a 1-D float array, which must be C-contiguous.
pub fn as_slice<'a>(arr: &'a PyReadonlyArray1<'_, f64>, name: &str) -> PyResult<&'a [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err(format!("{name} must be a C-contiguous float array")))
}

/// Copy a decision vector out of numpy so the GIL can be released while it
/// is evaluated.
pub fn decision_vector(arr: &PyReadonlyArray1<'_, f64>, n_vars: usize) -> PyResult<Vec<f64>> {
    let vars = as_slice(arr, "decision_vars")?;
    if vars.len() != n_vars {
        return Err(PyValueError::new_err(format!(
            "decision_vars has {} values, the policy expects {n_vars}",
            vars.len()
        )));
    }
    Ok(vars.to_vec())
}

/// Core errors surface as `ValueError` with their message.
pub fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}
