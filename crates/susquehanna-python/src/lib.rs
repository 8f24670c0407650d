mod convert;
mod equity;
mod model;

use pyo3::prelude::*;
use pyo3::types::PyDict;

#[pyfunction]
fn rust_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Attach `child` to `parent` and publish it in `sys.modules`, so that
/// `import susquehanna._core.equity` resolves without a package on disk.
fn add_submodule(parent: &Bound<'_, PyModule>, child: &Bound<'_, PyModule>) -> PyResult<()> {
    parent.add_submodule(child)?;
    let qualified = format!("{}.{}", parent.name()?, child.name()?);
    let modules = parent.py().import("sys")?.getattr("modules")?;
    modules.downcast::<PyDict>()?.set_item(qualified, child)?;
    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rust_version, m)?)?;
    m.add_class::<model::PySusquehannaModel>()?;

    add_submodule(m, &equity::module(m.py())?)?;
    add_submodule(m, &model::module(m.py())?)?;
    Ok(())
}
