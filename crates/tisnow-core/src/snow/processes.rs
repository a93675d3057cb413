/// Degree-day snow process functions.
///
/// Pure functions for each stage of a step; `run::step` chains them.
use super::constants::{DDF_DAYS_PER_RADIAN, DDF_PHASE_DAY};
use super::params::{Parameters, RainSnowMethod};

/// Liquid fraction of precipitation (0 = all snow, 1 = all rain).
pub fn precip_phase(method: &RainSnowMethod, temp: f64) -> f64 {
    match *method {
        RainSnowMethod::Threshold { rs_thresh } => {
            if temp <= rs_thresh {
                0.0
            } else {
                1.0
            }
        }
        RainSnowMethod::LinearRamp { snow_max, rain_min } => {
            if temp <= snow_max {
                0.0
            } else if temp >= rain_min {
                1.0
            } else {
                (temp - snow_max) / (rain_min - snow_max)
            }
        }
    }
}

/// Split precipitation by phase. Returns (snowfall, rainfall).
pub fn partition_precipitation(precip: f64, phase: f64) -> (f64, f64) {
    let snowfall = (1.0 - phase) * precip;
    let rainfall = precip - snowfall;
    (snowfall, rainfall)
}

/// Seasonal degree-day factor [mm/C/day].
///
/// A sinusoid around the ddf midpoint that crosses it rising on day 81,
/// peaks in early summer and bottoms out in winter.
pub fn degree_day_factor(params: &Parameters, day_of_year: u16) -> f64 {
    let angle = (f64::from(day_of_year) - DDF_PHASE_DAY) / DDF_DAYS_PER_RADIAN;
    params.ddf_midpoint() + angle.sin() * params.ddf_halfrange()
}

/// Melt the air could produce given unlimited snow.
///
/// Zero at or below the melt-onset threshold.
pub fn potential_melt(temp: f64, tair_melt_thresh: f64, ddf: f64) -> f64 {
    if temp > tair_melt_thresh {
        (temp - tair_melt_thresh) * ddf
    } else {
        0.0
    }
}

/// Melt limited to the snow on the ground.
pub fn bounded_melt(swe: f64, potential: f64) -> f64 {
    swe.min(potential)
}
