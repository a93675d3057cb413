use numpy::{PyReadonlyArray1, PyReadwriteArray1};
use pyo3::prelude::*;

use crate::convert::{checked_slice, contiguous_slice, contiguous_slice_mut, to_py_err};
use tisnow_core::bmi::vars::Variable;
use tisnow_core::calendar::Calendar;
use tisnow_core::forcing::ForcingData;
use tisnow_core::snow::params::{Parameters, RainSnowMethod};
use tisnow_core::snow::processes::degree_day_factor;
use tisnow_core::snow::run::{self, PackState};

define_timeseries_result! {
    /// Single-cell run results with typed numpy array attributes.
    pub struct SnowRunResult from tisnow_core::snow::run::SnowFluxesTimeseries {
        temp, precip, ppt_phase, snowfall, rainfall,
        ddf, pot_melt, melt, outflow, swe,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_params(
    rs_method: i64,
    rs_thresh: f64,
    snow_thresh_max: f64,
    rain_thresh_min: f64,
    ddf_max: f64,
    ddf_min: f64,
    tair_melt_thresh: f64,
) -> PyResult<Parameters> {
    let method = RainSnowMethod::from_code(rs_method, rs_thresh, snow_thresh_max, rain_thresh_min)
        .map_err(to_py_err)?;
    Parameters::new(method, ddf_max, ddf_min, tair_melt_thresh).map_err(to_py_err)
}

/// Advance swe and melt arrays one step in place, cell by cell.
///
/// `melt` receives snowmelt plus rainfall.
#[pyfunction]
#[allow(clippy::too_many_arguments)]
#[pyo3(signature = (
    temp, precip, doy, swe, melt,
    rs_method=1, rs_thresh=2.5, snow_thresh_max=1.5, rain_thresh_min=4.5,
    ddf_max=1.0, ddf_min=0.0, tair_melt_thresh=1.0,
))]
fn solve_snow(
    temp: PyReadonlyArray1<'_, f64>,
    precip: PyReadonlyArray1<'_, f64>,
    doy: u16,
    mut swe: PyReadwriteArray1<'_, f64>,
    mut melt: PyReadwriteArray1<'_, f64>,
    rs_method: i64,
    rs_thresh: f64,
    snow_thresh_max: f64,
    rain_thresh_min: f64,
    ddf_max: f64,
    ddf_min: f64,
    tair_melt_thresh: f64,
) -> PyResult<()> {
    let params = build_params(
        rs_method,
        rs_thresh,
        snow_thresh_max,
        rain_thresh_min,
        ddf_max,
        ddf_min,
        tair_melt_thresh,
    )?;
    let swe = contiguous_slice_mut(&mut swe)?;
    let melt = contiguous_slice_mut(&mut melt)?;
    let n = swe.len();
    let temp = checked_slice(&temp, n, "temp")?;
    let precip = checked_slice(&precip, n, "precip")?;
    if melt.len() != n {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "melt must have {} elements, got {}",
            n,
            melt.len()
        )));
    }

    Variable::Temperature.check_values(temp).map_err(to_py_err)?;
    Variable::Precipitation.check_values(precip).map_err(to_py_err)?;
    Variable::Swe.check_values(swe).map_err(to_py_err)?;

    let ddf = degree_day_factor(&params, doy);
    for i in 0..n {
        let (new_swe, fluxes) = run::step(swe[i], &params, precip[i], temp[i], ddf);
        swe[i] = new_swe;
        melt[i] = fluxes.outflow;
    }
    Ok(())
}

/// Run one cell over precipitation and temperature series.
#[pyfunction]
#[allow(clippy::too_many_arguments)]
#[pyo3(signature = (
    precip, temp,
    rs_method=1, rs_thresh=2.5, snow_thresh_max=1.5, rain_thresh_min=4.5,
    ddf_max=1.0, ddf_min=0.0, tair_melt_thresh=1.0,
    swe_init=0.0, dayofyear=274, year=2016,
))]
fn snow_run(
    py: Python<'_>,
    precip: PyReadonlyArray1<'_, f64>,
    temp: PyReadonlyArray1<'_, f64>,
    rs_method: i64,
    rs_thresh: f64,
    snow_thresh_max: f64,
    rain_thresh_min: f64,
    ddf_max: f64,
    ddf_min: f64,
    tair_melt_thresh: f64,
    swe_init: f64,
    dayofyear: u16,
    year: i32,
) -> PyResult<SnowRunResult> {
    let params = build_params(
        rs_method,
        rs_thresh,
        snow_thresh_max,
        rain_thresh_min,
        ddf_max,
        ddf_min,
        tair_melt_thresh,
    )?;
    let forcing = ForcingData::new(
        contiguous_slice(&precip)?.to_vec(),
        contiguous_slice(&temp)?.to_vec(),
    )
    .map_err(to_py_err)?;
    if !(swe_init.is_finite() && swe_init >= 0.0) {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "swe_init must be finite and non-negative, got {}",
            swe_init
        )));
    }
    let init = PackState {
        swe: swe_init,
        calendar: Calendar::new(dayofyear, year).map_err(to_py_err)?,
    };

    let ts = py.allow_threads(|| run::run(&params, &forcing, Some(&init)));
    Ok(SnowRunResult::from_timeseries(py, ts))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "snow")?;
    m.add_function(wrap_pyfunction!(solve_snow, &m)?)?;
    m.add_function(wrap_pyfunction!(snow_run, &m)?)?;
    m.add_class::<SnowRunResult>()?;
    parent.add_submodule(&m)?;
    Ok(())
}
