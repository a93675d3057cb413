use std::path::PathBuf;

use numpy::{PyArray1, PyArrayMethods, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;

use crate::convert::{contiguous_slice, contiguous_slice_mut, to_py_err};
use tisnow_core::{Bmi, SnowBmi};

/// Temperature-index snow model behind the Basic Model Interface.
///
/// `get_value` fills and returns the caller's array; `get_value_ptr` returns
/// a fresh copy, never a live view of model state.
#[pyclass(name = "SnowBmi", module = "tisnow._core.bmi")]
#[derive(Default)]
pub struct PySnowBmi {
    inner: SnowBmi,
}

/// Borrow `dest` mutably, fill it through `fill`, and hand it back.
fn fill_array<'py, T: numpy::Element>(
    dest: Bound<'py, PyArray1<T>>,
    fill: impl FnOnce(&mut [T]) -> PyResult<()>,
) -> PyResult<Bound<'py, PyArray1<T>>> {
    {
        let mut rw = dest
            .try_readwrite()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        fill(contiguous_slice_mut(&mut rw)?)?;
    }
    Ok(dest)
}

#[pymethods]
impl PySnowBmi {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    // -- lifecycle --

    #[pyo3(signature = (filename=None))]
    fn initialize(&mut self, filename: Option<PathBuf>) -> PyResult<()> {
        self.inner.initialize(filename.as_deref()).map_err(to_py_err)
    }

    fn update(&mut self) -> PyResult<()> {
        self.inner.update().map_err(to_py_err)
    }

    fn update_frac(&mut self, time_frac: f64) -> PyResult<()> {
        self.inner.update_frac(time_frac).map_err(to_py_err)
    }

    fn update_until(&mut self, then: f64) -> PyResult<()> {
        self.inner.update_until(then).map_err(to_py_err)
    }

    fn finalize(&mut self) -> PyResult<()> {
        self.inner.finalize().map_err(to_py_err)
    }

    // -- metadata --

    fn get_component_name(&self) -> &'static str {
        self.inner.get_component_name()
    }

    fn get_input_var_names(&self) -> Vec<&'static str> {
        self.inner.get_input_var_names().to_vec()
    }

    fn get_output_var_names(&self) -> Vec<&'static str> {
        self.inner.get_output_var_names().to_vec()
    }

    fn get_input_item_count(&self) -> usize {
        self.inner.get_input_item_count()
    }

    fn get_output_item_count(&self) -> usize {
        self.inner.get_output_item_count()
    }

    fn get_var_grid(&self, name: &str) -> PyResult<i32> {
        self.inner.get_var_grid(name).map_err(to_py_err)
    }

    fn get_var_type(&self, name: &str) -> PyResult<&'static str> {
        // numpy spelling of the element type
        self.inner.get_var_type(name).map_err(to_py_err)?;
        Ok("float64")
    }

    fn get_var_units(&self, name: &str) -> PyResult<&'static str> {
        self.inner.get_var_units(name).map_err(to_py_err)
    }

    fn get_var_itemsize(&self, name: &str) -> PyResult<usize> {
        self.inner.get_var_itemsize(name).map_err(to_py_err)
    }

    fn get_var_nbytes(&self, name: &str) -> PyResult<usize> {
        self.inner.get_var_nbytes(name).map_err(to_py_err)
    }

    fn get_var_location(&self, name: &str) -> PyResult<&'static str> {
        self.inner.get_var_location(name).map_err(to_py_err)
    }

    // -- time --

    fn get_current_time(&self) -> PyResult<f64> {
        self.inner.get_current_time().map_err(to_py_err)
    }

    fn get_start_time(&self) -> f64 {
        self.inner.get_start_time()
    }

    fn get_end_time(&self) -> f64 {
        self.inner.get_end_time()
    }

    fn get_time_units(&self) -> &'static str {
        self.inner.get_time_units()
    }

    fn get_time_step(&self) -> PyResult<f64> {
        self.inner.get_time_step().map_err(to_py_err)
    }

    // -- values --

    fn get_value<'py>(
        &self,
        name: &str,
        dest: Bound<'py, PyArray1<f64>>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        fill_array(dest, |out| self.inner.get_value(name, out).map_err(to_py_err))
    }

    fn get_value_ptr<'py>(&self, py: Python<'py>, name: &str) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let values = self.inner.get_value_ref(name).map_err(to_py_err)?;
        Ok(PyArray1::from_slice(py, values))
    }

    fn get_value_at_indices<'py>(
        &self,
        name: &str,
        dest: Bound<'py, PyArray1<f64>>,
        indices: Vec<usize>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        fill_array(dest, |out| {
            self.inner
                .get_value_at_indices(name, out, &indices)
                .map_err(to_py_err)
        })
    }

    fn set_value(&mut self, name: &str, src: PyReadonlyArray1<'_, f64>) -> PyResult<()> {
        let values = contiguous_slice(&src)?;
        self.inner.set_value(name, values).map_err(to_py_err)
    }

    fn set_value_at_indices(
        &mut self,
        name: &str,
        inds: Vec<usize>,
        src: PyReadonlyArray1<'_, f64>,
    ) -> PyResult<()> {
        let values = contiguous_slice(&src)?;
        self.inner
            .set_value_at_indices(name, &inds, values)
            .map_err(to_py_err)
    }

    // -- grid --

    fn get_grid_rank(&self, grid: i32) -> PyResult<usize> {
        self.inner.get_grid_rank(grid).map_err(to_py_err)
    }

    fn get_grid_size(&self, grid: i32) -> PyResult<usize> {
        self.inner.get_grid_size(grid).map_err(to_py_err)
    }

    fn get_grid_node_count(&self, grid: i32) -> PyResult<usize> {
        self.inner.get_grid_node_count(grid).map_err(to_py_err)
    }

    fn get_grid_type(&self, grid: i32) -> PyResult<&'static str> {
        self.inner.get_grid_type(grid).map_err(to_py_err)
    }

    fn get_grid_shape<'py>(
        &self,
        grid: i32,
        shape: Bound<'py, PyArray1<usize>>,
    ) -> PyResult<Bound<'py, PyArray1<usize>>> {
        fill_array(shape, |out| self.inner.get_grid_shape(grid, out).map_err(to_py_err))
    }

    fn get_grid_x(&self, grid: i32, x: Bound<'_, PyArray1<f64>>) -> PyResult<()> {
        fill_array(x, |out| self.inner.get_grid_x(grid, out).map_err(to_py_err)).map(|_| ())
    }

    fn get_grid_y(&self, grid: i32, y: Bound<'_, PyArray1<f64>>) -> PyResult<()> {
        fill_array(y, |out| self.inner.get_grid_y(grid, out).map_err(to_py_err)).map(|_| ())
    }

    fn get_grid_z(&self, grid: i32, z: Bound<'_, PyArray1<f64>>) -> PyResult<()> {
        fill_array(z, |out| self.inner.get_grid_z(grid, out).map_err(to_py_err)).map(|_| ())
    }

    fn get_grid_edge_count(&self, grid: i32) -> PyResult<usize> {
        self.inner.get_grid_edge_count(grid).map_err(to_py_err)
    }

    fn get_grid_face_count(&self, grid: i32) -> PyResult<usize> {
        self.inner.get_grid_face_count(grid).map_err(to_py_err)
    }
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "bmi")?;
    m.add_class::<PySnowBmi>()?;
    parent.add_submodule(&m)?;
    Ok(())
}
