//! Variable-exchange facade.
//!
//! A Basic Model Interface style boundary over `SnowModel`: an external
//! driver pushes forcing in and pulls results out by standard name, and
//! controls time, without touching the model's internals. Whole-array gets
//! copy out and sets copy in; `get_value_ref` is the zero-copy alternative.

pub mod grid;
pub mod vars;

use std::path::Path;

use log::{debug, warn};

use crate::config::Config;
use crate::error::{SnowError, SnowResult};
use crate::model::SnowModel;
use grid::{GridInfo, GRID_ID};
use vars::{Variable, INPUT_VAR_NAMES, OUTPUT_VAR_NAMES};

pub const COMPONENT_NAME: &str = "Temperature Index Snow Model with BMI";

/// Standard exchange surface of a time-stepping model.
///
/// Grid topology queries default to `UnsupportedQuery`; models on structured
/// or unstructured grids override them.
pub trait Bmi {
    // -- lifecycle --

    /// Build the model from a YAML configuration file, or from defaults.
    fn initialize(&mut self, config_file: Option<&Path>) -> SnowResult<()>;
    fn update(&mut self) -> SnowResult<()>;
    fn update_frac(&mut self, time_frac: f64) -> SnowResult<()>;
    fn update_until(&mut self, then: f64) -> SnowResult<()>;
    fn finalize(&mut self) -> SnowResult<()>;

    // -- component / variable metadata --

    fn get_component_name(&self) -> &'static str;
    fn get_input_var_names(&self) -> &'static [&'static str];
    fn get_output_var_names(&self) -> &'static [&'static str];

    fn get_input_item_count(&self) -> usize {
        self.get_input_var_names().len()
    }

    fn get_output_item_count(&self) -> usize {
        self.get_output_var_names().len()
    }

    fn get_var_grid(&self, name: &str) -> SnowResult<i32>;
    fn get_var_type(&self, name: &str) -> SnowResult<&'static str>;
    fn get_var_units(&self, name: &str) -> SnowResult<&'static str>;
    fn get_var_itemsize(&self, name: &str) -> SnowResult<usize>;
    fn get_var_nbytes(&self, name: &str) -> SnowResult<usize>;
    fn get_var_location(&self, name: &str) -> SnowResult<&'static str>;

    // -- time --

    fn get_current_time(&self) -> SnowResult<f64>;
    fn get_start_time(&self) -> f64;
    fn get_end_time(&self) -> f64;
    fn get_time_units(&self) -> &'static str;
    fn get_time_step(&self) -> SnowResult<f64>;

    // -- values --

    /// Copy a variable into `dest`, which must match its length.
    fn get_value(&self, name: &str, dest: &mut [f64]) -> SnowResult<()>;
    /// Borrow a variable's backing array without copying.
    fn get_value_ref(&self, name: &str) -> SnowResult<&[f64]>;
    /// Copy `values[inds[i]]` into `dest[i]` using flat indices.
    fn get_value_at_indices(&self, name: &str, dest: &mut [f64], inds: &[usize])
        -> SnowResult<()>;
    /// Overwrite a variable from `src`, which must match its length and hold
    /// values valid for that variable.
    fn set_value(&mut self, name: &str, src: &[f64]) -> SnowResult<()>;
    /// Write `src[i]` to `values[inds[i]]` using flat indices.
    fn set_value_at_indices(&mut self, name: &str, inds: &[usize], src: &[f64])
        -> SnowResult<()>;

    // -- grid --

    fn get_grid_rank(&self, grid: i32) -> SnowResult<usize>;
    fn get_grid_size(&self, grid: i32) -> SnowResult<usize>;
    fn get_grid_type(&self, grid: i32) -> SnowResult<&'static str>;
    fn get_grid_shape(&self, grid: i32, shape: &mut [usize]) -> SnowResult<()>;

    fn get_grid_node_count(&self, grid: i32) -> SnowResult<usize> {
        self.get_grid_size(grid)
    }

    fn get_grid_spacing(&self, _grid: i32, _spacing: &mut [f64]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_spacing"))
    }

    fn get_grid_origin(&self, _grid: i32, _origin: &mut [f64]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_origin"))
    }

    fn get_grid_x(&self, _grid: i32, _x: &mut [f64]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_x"))
    }

    fn get_grid_y(&self, _grid: i32, _y: &mut [f64]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_y"))
    }

    fn get_grid_z(&self, _grid: i32, _z: &mut [f64]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_z"))
    }

    fn get_grid_edge_count(&self, _grid: i32) -> SnowResult<usize> {
        Err(SnowError::UnsupportedQuery("get_grid_edge_count"))
    }

    fn get_grid_face_count(&self, _grid: i32) -> SnowResult<usize> {
        Err(SnowError::UnsupportedQuery("get_grid_face_count"))
    }

    fn get_grid_edge_nodes(&self, _grid: i32, _edge_nodes: &mut [usize]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_edge_nodes"))
    }

    fn get_grid_face_edges(&self, _grid: i32, _face_edges: &mut [usize]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_face_edges"))
    }

    fn get_grid_face_nodes(&self, _grid: i32, _face_nodes: &mut [usize]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_face_nodes"))
    }

    fn get_grid_nodes_per_face(&self, _grid: i32, _nodes_per_face: &mut [usize]) -> SnowResult<()> {
        Err(SnowError::UnsupportedQuery("get_grid_nodes_per_face"))
    }
}

/// Exchange facade for the degree-day snow model.
///
/// Starts uninitialized; `finalize` drops the model and returns it to that
/// state.
#[derive(Debug, Default)]
pub struct SnowBmi {
    model: Option<SnowModel>,
}

impl SnowBmi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize from an in-memory configuration.
    pub fn initialize_with(&mut self, config: &Config) -> SnowResult<()> {
        let model = SnowModel::from_config(config)?;
        debug!("{} initialized with {} cell(s)", COMPONENT_NAME, model.n_cells());
        self.model = Some(model);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.model.is_some()
    }

    /// The underlying controller, if initialized.
    pub fn model(&self) -> Option<&SnowModel> {
        self.model.as_ref()
    }

    fn live(&self) -> SnowResult<&SnowModel> {
        self.model.as_ref().ok_or_else(|| {
            warn!("{} used before initialize or after finalize", COMPONENT_NAME);
            SnowError::NotInitialized
        })
    }

    fn live_mut(&mut self) -> SnowResult<&mut SnowModel> {
        self.model.as_mut().ok_or_else(|| {
            warn!("{} used before initialize or after finalize", COMPONENT_NAME);
            SnowError::NotInitialized
        })
    }

    fn grid_info(&self, grid: i32) -> SnowResult<GridInfo> {
        if grid != GRID_ID {
            return Err(SnowError::UnknownGrid(grid));
        }
        Ok(GridInfo::for_cells(self.live()?.n_cells()))
    }
}

fn check_len(name: &str, expected: usize, actual: usize) -> SnowResult<()> {
    if expected != actual {
        return Err(SnowError::SizeMismatch {
            name: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_indices(inds: &[usize], len: usize) -> SnowResult<()> {
    match inds.iter().find(|&&i| i >= len) {
        Some(&index) => Err(SnowError::IndexOutOfBounds { index, len }),
        None => Ok(()),
    }
}

impl Bmi for SnowBmi {
    fn initialize(&mut self, config_file: Option<&Path>) -> SnowResult<()> {
        let config = match config_file {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        self.initialize_with(&config)
    }

    fn update(&mut self) -> SnowResult<()> {
        self.live_mut()?.advance_one_step();
        Ok(())
    }

    fn update_frac(&mut self, time_frac: f64) -> SnowResult<()> {
        self.live_mut()?.advance_by_fraction(time_frac)
    }

    fn update_until(&mut self, then: f64) -> SnowResult<()> {
        self.live_mut()?.advance_until(then)
    }

    fn finalize(&mut self) -> SnowResult<()> {
        self.live()?;
        self.model = None;
        debug!("{} finalized", COMPONENT_NAME);
        Ok(())
    }

    fn get_component_name(&self) -> &'static str {
        COMPONENT_NAME
    }

    fn get_input_var_names(&self) -> &'static [&'static str] {
        INPUT_VAR_NAMES
    }

    fn get_output_var_names(&self) -> &'static [&'static str] {
        OUTPUT_VAR_NAMES
    }

    fn get_var_grid(&self, name: &str) -> SnowResult<i32> {
        Variable::from_name(name)?;
        Ok(GRID_ID)
    }

    fn get_var_type(&self, name: &str) -> SnowResult<&'static str> {
        Variable::from_name(name)?;
        Ok("f64")
    }

    fn get_var_units(&self, name: &str) -> SnowResult<&'static str> {
        Ok(Variable::from_name(name)?.units())
    }

    fn get_var_itemsize(&self, name: &str) -> SnowResult<usize> {
        Variable::from_name(name)?;
        Ok(std::mem::size_of::<f64>())
    }

    fn get_var_nbytes(&self, name: &str) -> SnowResult<usize> {
        let itemsize = self.get_var_itemsize(name)?;
        Ok(itemsize * self.get_value_ref(name)?.len())
    }

    fn get_var_location(&self, name: &str) -> SnowResult<&'static str> {
        Variable::from_name(name)?;
        Ok("node")
    }

    fn get_current_time(&self) -> SnowResult<f64> {
        Ok(self.live()?.time())
    }

    fn get_start_time(&self) -> f64 {
        0.0
    }

    fn get_end_time(&self) -> f64 {
        f64::INFINITY
    }

    fn get_time_units(&self) -> &'static str {
        "s"
    }

    fn get_time_step(&self) -> SnowResult<f64> {
        Ok(self.live()?.time_step())
    }

    fn get_value(&self, name: &str, dest: &mut [f64]) -> SnowResult<()> {
        let values = self.get_value_ref(name)?;
        check_len(name, values.len(), dest.len())?;
        dest.copy_from_slice(values);
        Ok(())
    }

    fn get_value_ref(&self, name: &str) -> SnowResult<&[f64]> {
        let var = Variable::from_name(name)?;
        Ok(var.field(self.live()?.state()).as_slice())
    }

    fn get_value_at_indices(
        &self,
        name: &str,
        dest: &mut [f64],
        inds: &[usize],
    ) -> SnowResult<()> {
        let values = self.get_value_ref(name)?;
        check_len(name, inds.len(), dest.len())?;
        check_indices(inds, values.len())?;
        for (d, &i) in dest.iter_mut().zip(inds) {
            *d = values[i];
        }
        Ok(())
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> SnowResult<()> {
        let var = Variable::from_name(name)?;
        let values = var.field_mut(self.live_mut()?.state_mut());
        check_len(name, values.len(), src.len())?;
        var.check_values(src)?;
        values.copy_from_slice(src);
        Ok(())
    }

    fn set_value_at_indices(
        &mut self,
        name: &str,
        inds: &[usize],
        src: &[f64],
    ) -> SnowResult<()> {
        let var = Variable::from_name(name)?;
        let values = var.field_mut(self.live_mut()?.state_mut());
        check_len(name, inds.len(), src.len())?;
        check_indices(inds, values.len())?;
        var.check_values(src)?;
        for (&i, &v) in inds.iter().zip(src) {
            values[i] = v;
        }
        Ok(())
    }

    fn get_grid_rank(&self, grid: i32) -> SnowResult<usize> {
        Ok(self.grid_info(grid)?.rank())
    }

    fn get_grid_size(&self, grid: i32) -> SnowResult<usize> {
        Ok(self.grid_info(grid)?.size())
    }

    fn get_grid_type(&self, grid: i32) -> SnowResult<&'static str> {
        Ok(self.grid_info(grid)?.type_name())
    }

    fn get_grid_shape(&self, grid: i32, shape: &mut [usize]) -> SnowResult<()> {
        let dims = self.grid_info(grid)?.shape();
        check_len("grid shape", dims.len(), shape.len())?;
        shape.copy_from_slice(&dims);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::vars::{MELT, PRECIPITATION, SWE, TEMPERATURE};

    fn initialized(config: Config) -> SnowBmi {
        let mut bmi = SnowBmi::new();
        bmi.initialize_with(&config).unwrap();
        bmi
    }

    fn scenario(swe_init: f64) -> SnowBmi {
        initialized(Config {
            swe_init,
            dayofyear: 81,
            year: 2017,
            ..Config::default()
        })
    }

    #[test]
    fn uninitialized_calls_fail() {
        let mut bmi = SnowBmi::new();
        assert!(!bmi.is_initialized());
        assert_eq!(bmi.update(), Err(SnowError::NotInitialized));
        assert_eq!(bmi.get_current_time(), Err(SnowError::NotInitialized));
        assert_eq!(bmi.set_value(TEMPERATURE, &[1.0]), Err(SnowError::NotInitialized));
        assert_eq!(bmi.finalize(), Err(SnowError::NotInitialized));
        // Static metadata needs no model.
        assert_eq!(bmi.get_var_units(SWE), Ok("mm"));
    }

    #[test]
    fn finalize_releases_the_model() {
        let mut bmi = initialized(Config::default());
        bmi.finalize().unwrap();
        assert!(bmi.model().is_none());
        assert_eq!(bmi.update_until(1.0), Err(SnowError::NotInitialized));
        assert!(matches!(bmi.get_value_ref(SWE), Err(SnowError::NotInitialized)));
    }

    #[test]
    fn initialize_from_defaults() {
        let mut bmi = SnowBmi::new();
        bmi.initialize(None).unwrap();
        assert_eq!(bmi.get_time_step(), Ok(86_400.0));
        assert_eq!(bmi.model().map(|m| m.day_of_year()), Some(274));
    }

    #[test]
    fn invalid_config_leaves_facade_unchanged() {
        let mut bmi = scenario(10.0);
        let bad = Config {
            rs_method: 0,
            ..Config::default()
        };
        assert!(bmi.initialize_with(&bad).is_err());
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[10.0]);
    }

    #[test]
    fn metadata() {
        let bmi = SnowBmi::new();
        assert_eq!(bmi.get_component_name(), COMPONENT_NAME);
        assert_eq!(bmi.get_input_item_count(), 2);
        assert_eq!(bmi.get_output_item_count(), 2);
        assert_eq!(bmi.get_input_var_names(), &[PRECIPITATION, TEMPERATURE]);
        assert_eq!(bmi.get_var_units(PRECIPITATION), Ok("mm d-1"));
        assert_eq!(bmi.get_var_units(TEMPERATURE), Ok("C"));
        assert_eq!(bmi.get_var_units(MELT), Ok("mm d-1"));
        assert_eq!(bmi.get_var_type(MELT), Ok("f64"));
        assert_eq!(bmi.get_var_itemsize(MELT), Ok(8));
        assert_eq!(bmi.get_var_location(MELT), Ok("node"));
        assert_eq!(bmi.get_var_grid(MELT), Ok(0));
        assert!(matches!(bmi.get_var_units("nope"), Err(SnowError::UnknownVariable(_))));
    }

    #[test]
    fn time_bounds() {
        let bmi = scenario(0.0);
        assert_eq!(bmi.get_start_time(), 0.0);
        assert_eq!(bmi.get_end_time(), f64::INFINITY);
        assert_eq!(bmi.get_time_units(), "s");
        assert_eq!(bmi.get_current_time(), Ok(0.0));
    }

    #[test]
    fn nbytes_counts_cells() {
        let bmi = initialized(Config {
            n_cells: 3,
            ..Config::default()
        });
        assert_eq!(bmi.get_var_nbytes(SWE), Ok(24));
    }

    #[test]
    fn set_then_update_then_get() {
        let mut bmi = scenario(10.0);
        bmi.set_value(TEMPERATURE, &[5.0]).unwrap();
        bmi.set_value(PRECIPITATION, &[0.0]).unwrap();
        bmi.update().unwrap();

        let mut swe = [0.0];
        let mut melt = [0.0];
        bmi.get_value(SWE, &mut swe).unwrap();
        bmi.get_value(MELT, &mut melt).unwrap();
        assert!((swe[0] - 8.0).abs() < 1e-12);
        assert!((melt[0] - 2.0).abs() < 1e-12);
        assert_eq!(bmi.get_current_time(), Ok(86_400.0));
    }

    #[test]
    fn get_value_is_a_copy() {
        let mut bmi = scenario(10.0);
        let mut out = [0.0];
        bmi.get_value(SWE, &mut out).unwrap();
        out[0] = 99.0;
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[10.0]);

        bmi.set_value(SWE, &[4.0]).unwrap();
        assert_eq!(out[0], 99.0);
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[4.0]);
    }

    #[test]
    fn shape_mismatch_rejected_without_mutation() {
        let mut bmi = scenario(10.0);
        let err = bmi.set_value(SWE, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            SnowError::SizeMismatch {
                name: SWE.to_string(),
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[10.0]);

        let mut dest = [0.0; 3];
        assert!(bmi.get_value(SWE, &mut dest).is_err());
    }

    #[test]
    fn indexed_access() {
        let mut bmi = initialized(Config {
            n_cells: 4,
            ..Config::default()
        });
        bmi.set_value_at_indices(TEMPERATURE, &[3, 1], &[-2.0, 7.0]).unwrap();
        assert_eq!(bmi.get_value_ref(TEMPERATURE).unwrap(), &[0.0, 7.0, 0.0, -2.0]);

        let mut dest = [0.0; 2];
        bmi.get_value_at_indices(TEMPERATURE, &mut dest, &[1, 3]).unwrap();
        assert_eq!(dest, [7.0, -2.0]);
    }

    #[test]
    fn indexed_out_of_bounds_is_all_or_nothing() {
        let mut bmi = initialized(Config {
            n_cells: 2,
            ..Config::default()
        });
        let err = bmi
            .set_value_at_indices(TEMPERATURE, &[0, 2], &[5.0, 5.0])
            .unwrap_err();
        assert_eq!(err, SnowError::IndexOutOfBounds { index: 2, len: 2 });
        assert_eq!(bmi.get_value_ref(TEMPERATURE).unwrap(), &[0.0, 0.0]);

        let mut dest = [0.0];
        assert!(bmi.get_value_at_indices(TEMPERATURE, &mut dest, &[0, 1]).is_err());
    }

    #[test]
    fn invalid_values_rejected_without_mutation() {
        let mut bmi = scenario(10.0);
        bmi.set_value(PRECIPITATION, &[2.0]).unwrap();

        let err = bmi.set_value(PRECIPITATION, &[-5.0]).unwrap_err();
        assert!(matches!(err, SnowError::InvalidParameter { name: PRECIPITATION, .. }));
        assert!(bmi.set_value(PRECIPITATION, &[f64::NAN]).is_err());
        assert!(bmi.set_value(TEMPERATURE, &[f64::NAN]).is_err());
        assert!(bmi.set_value(SWE, &[-2.0]).is_err());
        assert!(bmi.set_value(MELT, &[f64::NAN]).is_err());

        assert_eq!(bmi.get_value_ref(PRECIPITATION).unwrap(), &[2.0]);
        assert_eq!(bmi.get_value_ref(TEMPERATURE).unwrap(), &[0.0]);
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[10.0]);
        assert_eq!(bmi.get_value_ref(MELT).unwrap(), &[0.0]);
    }

    #[test]
    fn invalid_indexed_values_rejected_without_mutation() {
        let mut bmi = initialized(Config {
            n_cells: 3,
            swe_init: 4.0,
            ..Config::default()
        });
        let err = bmi
            .set_value_at_indices(PRECIPITATION, &[0, 2], &[1.0, -5.0])
            .unwrap_err();
        assert!(matches!(err, SnowError::InvalidParameter { .. }));
        assert_eq!(bmi.get_value_ref(PRECIPITATION).unwrap(), &[0.0, 0.0, 0.0]);

        assert!(bmi.set_value_at_indices(SWE, &[1], &[f64::NAN]).is_err());
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[4.0, 4.0, 4.0]);
    }

    #[test]
    fn accepted_values_keep_mass_non_negative() {
        let mut bmi = scenario(0.0);
        bmi.set_value(TEMPERATURE, &[-3.0]).unwrap();
        assert!(bmi.set_value(PRECIPITATION, &[-5.0]).is_err());
        bmi.update().unwrap();
        assert_eq!(bmi.get_value_ref(SWE).unwrap(), &[0.0]);
        assert_eq!(bmi.get_value_ref(MELT).unwrap(), &[0.0]);
    }

    #[test]
    fn scalar_grid() {
        let bmi = scenario(0.0);
        assert_eq!(bmi.get_grid_type(0), Ok("scalar"));
        assert_eq!(bmi.get_grid_rank(0), Ok(0));
        assert_eq!(bmi.get_grid_size(0), Ok(1));
        assert_eq!(bmi.get_grid_node_count(0), Ok(1));
        let mut shape: [usize; 0] = [];
        assert!(bmi.get_grid_shape(0, &mut shape).is_ok());
        assert_eq!(bmi.get_grid_size(1), Err(SnowError::UnknownGrid(1)));
    }

    #[test]
    fn vector_grid_for_many_cells() {
        let bmi = initialized(Config {
            n_cells: 3,
            ..Config::default()
        });
        let mut shape = [0usize; 1];
        bmi.get_grid_shape(0, &mut shape).unwrap();
        assert_eq!(shape, [3]);
        assert_eq!(bmi.get_grid_type(0), Ok("vector"));
    }

    #[test]
    fn topology_queries_fail_loudly() {
        let bmi = scenario(0.0);
        let mut f = [0.0; 1];
        let mut u = [0usize; 1];
        assert_eq!(bmi.get_grid_x(0, &mut f), Err(SnowError::UnsupportedQuery("get_grid_x")));
        assert!(bmi.get_grid_y(0, &mut f).is_err());
        assert!(bmi.get_grid_z(0, &mut f).is_err());
        assert!(bmi.get_grid_spacing(0, &mut f).is_err());
        assert!(bmi.get_grid_origin(0, &mut f).is_err());
        assert!(bmi.get_grid_edge_count(0).is_err());
        assert!(bmi.get_grid_face_count(0).is_err());
        assert!(bmi.get_grid_edge_nodes(0, &mut u).is_err());
        assert!(bmi.get_grid_face_edges(0, &mut u).is_err());
        assert!(bmi.get_grid_face_nodes(0, &mut u).is_err());
        assert!(bmi.get_grid_nodes_per_face(0, &mut u).is_err());
    }

    #[test]
    fn fractional_and_until() {
        let mut bmi = scenario(10.0);
        bmi.update_frac(0.5).unwrap();
        assert_eq!(bmi.get_current_time(), Ok(43_200.0));
        assert_eq!(bmi.get_time_step(), Ok(86_400.0));

        let target = 43_200.0 + 2.25 * 86_400.0;
        bmi.update_until(target).unwrap();
        assert!((bmi.get_current_time().unwrap() - target).abs() < 1e-6);

        assert!(matches!(bmi.update_until(0.0), Err(SnowError::InvalidTarget { .. })));
    }
}
