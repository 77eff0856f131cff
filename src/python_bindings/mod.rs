//! Python bindings that expose the segmenter via PyO3.
//!
//! Matrices arrive as nested lists (`replicate -> row -> value`); shape and
//! count validation happens here before the core runs.
use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
    types::PyModule,
};

use crate::model::FitOptions;
use crate::{ContactMatrices, SegmentationConfig, SegmentationError, Segmenter};

fn to_py_err(err: SegmentationError) -> PyErr {
    match err {
        SegmentationError::Matrix(inner) => PyValueError::new_err(inner.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

fn validate(matrices: Vec<Vec<Vec<f64>>>) -> PyResult<ContactMatrices> {
    ContactMatrices::from_nested(matrices).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Python-facing segmenter with configurable fit limits.
#[pyclass]
#[derive(Debug)]
pub struct PySegmenter {
    inner: Segmenter,
}

#[pymethods]
impl PySegmenter {
    #[new]
    #[pyo3(signature = (fast = false, max_iterations = 1000, tolerance = 1e-6))]
    /// Create a segmenter.
    pub fn new(fast: bool, max_iterations: usize, tolerance: f64) -> Self {
        let fit = FitOptions::default()
            .with_max_iterations(max_iterations)
            .with_tolerance(tolerance);
        let config = SegmentationConfig::default()
            .with_fast(fast)
            .with_fit_options(fit);
        Self {
            inner: Segmenter::new(config),
        }
    }

    /// Segment replicate matrices.
    ///
    /// Args:
    ///     matrices: List of square matrices, each a list of rows.
    ///
    /// Returns:
    ///     Tuple of the 0/1 breakpoint list and the total log-likelihood.
    pub fn run(&self, matrices: Vec<Vec<Vec<f64>>>) -> PyResult<(Vec<u8>, f64)> {
        let matrices = validate(matrices)?;
        let result = self.inner.run(&matrices).map_err(to_py_err)?;
        Ok((result.breakpoints.into_vec(), result.log_likelihood))
    }
}

/// Segment replicate matrices with default limits; returns the 0/1 list.
#[pyfunction]
#[pyo3(signature = (matrices, fast = false))]
pub fn find_breakpoints(matrices: Vec<Vec<Vec<f64>>>, fast: bool) -> PyResult<Vec<u8>> {
    let matrices = validate(matrices)?;
    crate::find_breakpoints(&matrices, fast)
        .map(|set| set.into_vec())
        .map_err(to_py_err)
}

/// Create Python module.
#[pymodule]
pub fn tadseg_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySegmenter>()?;
    m.add_function(wrap_pyfunction!(find_breakpoints, m)?)?;
    Ok(())
}
