use numpy::{PyReadonlyArray1, PyReadwriteArray1};
use pyo3::exceptions::{
    PyIndexError, PyKeyError, PyNotImplementedError, PyRuntimeError, PyValueError,
};
use pyo3::prelude::*;
use tisnow_core::SnowError;

/// Map a core error onto the closest Python exception.
pub fn to_py_err(err: SnowError) -> PyErr {
    let msg = err.to_string();
    match err {
        SnowError::NotInitialized => PyRuntimeError::new_err(msg),
        SnowError::UnsupportedQuery(_) => PyNotImplementedError::new_err(msg),
        SnowError::UnknownVariable(_) => PyKeyError::new_err(msg),
        SnowError::IndexOutOfBounds { .. } => PyIndexError::new_err(msg),
        SnowError::InvalidParameter { .. }
        | SnowError::InvalidTarget { .. }
        | SnowError::UnknownGrid(_)
        | SnowError::SizeMismatch { .. }
        | SnowError::Config(_)
        | SnowError::Forcing(_) => PyValueError::new_err(msg),
    }
}

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'a>(arr: &'a PyReadonlyArray1<'_, f64>) -> PyResult<&'a [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Mutable counterpart of `contiguous_slice`.
pub fn contiguous_slice_mut<'a, 'py, T: numpy::Element>(
    arr: &'a mut PyReadwriteArray1<'py, T>,
) -> PyResult<&'a mut [T]> {
    arr.as_slice_mut()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Validate length + contiguity of a numpy array.
pub fn checked_slice<'a>(
    arr: &'a PyReadonlyArray1<'_, f64>,
    expected_len: usize,
    name: &str,
) -> PyResult<&'a [f64]> {
    let slice = contiguous_slice(arr)?;
    if slice.len() != expected_len {
        return Err(PyValueError::new_err(format!(
            "{} must have {} elements, got {}",
            name,
            expected_len,
            slice.len()
        )));
    }
    Ok(slice)
}
