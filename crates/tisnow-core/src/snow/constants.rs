//! Degree-day snow model constants.
//!
//! Fixed values of the seasonal melt-factor curve and the model defaults.

/// Day of year at which the degree-day factor crosses its annual mean.
pub const DDF_PHASE_DAY: f64 = 81.0;

/// Divisor turning days into radians for the seasonal melt-factor sinusoid.
pub const DDF_DAYS_PER_RADIAN: f64 = 58.09;

/// Nominal time step [s].
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Rain/snow method codes used in configuration files.
pub const RS_METHOD_THRESHOLD: i64 = 1;
pub const RS_METHOD_LINEAR_RAMP: i64 = 2;

pub const DEFAULT_RS_THRESH: f64 = 2.5;
pub const DEFAULT_SNOW_THRESH_MAX: f64 = 1.5;
pub const DEFAULT_RAIN_THRESH_MIN: f64 = 4.5;
pub const DEFAULT_DDF_MAX: f64 = 1.0;
pub const DEFAULT_DDF_MIN: f64 = 0.0;
pub const DEFAULT_TAIR_MELT_THRESH: f64 = 1.0;
pub const DEFAULT_DAY_OF_YEAR: u16 = 274;
pub const DEFAULT_YEAR: i32 = 2016;

/// Numeric parameter names in canonical order.
pub const PARAM_NAMES: &[&str] = &["ddf_max", "ddf_min", "tair_melt_thresh"];

/// Physical bounds as (min, max) tuples, in PARAM_NAMES order.
/// Degree-day factors are in mm/C/day; the melt threshold in C.
pub const PARAM_BOUNDS: &[(f64, f64)] = &[
    (0.0, 20.0),   // ddf_max
    (0.0, 20.0),   // ddf_min
    (-10.0, 10.0), // tair_melt_thresh
];

/// Number of numeric parameters.
pub const N_PARAMS: usize = 3;
