/// Degree-day snow model parameters.
///
/// Immutable for the life of a model instance. The rain/snow partitioning
/// method is selected once here, so the solver never sees an invalid code.
use super::constants::{
    N_PARAMS, PARAM_BOUNDS, PARAM_NAMES, RS_METHOD_LINEAR_RAMP, RS_METHOD_THRESHOLD,
};
use crate::error::{SnowError, SnowResult};

/// How precipitation is split into rain and snow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RainSnowMethod {
    /// All snow at or below `rs_thresh` [C], all rain above it.
    Threshold { rs_thresh: f64 },
    /// All snow at or below `snow_max` [C], all rain at or above `rain_min`
    /// [C], linear mix in between.
    LinearRamp { snow_max: f64, rain_min: f64 },
}

impl RainSnowMethod {
    pub fn threshold(rs_thresh: f64) -> SnowResult<Self> {
        if !rs_thresh.is_finite() {
            return Err(SnowError::invalid("rs_thresh", format!("{} is not finite", rs_thresh)));
        }
        Ok(Self::Threshold { rs_thresh })
    }

    pub fn linear_ramp(snow_max: f64, rain_min: f64) -> SnowResult<Self> {
        if !snow_max.is_finite() {
            return Err(SnowError::invalid(
                "snow_thresh_max",
                format!("{} is not finite", snow_max),
            ));
        }
        if !rain_min.is_finite() {
            return Err(SnowError::invalid(
                "rain_thresh_min",
                format!("{} is not finite", rain_min),
            ));
        }
        if snow_max >= rain_min {
            return Err(SnowError::invalid(
                "snow_thresh_max",
                format!(
                    "snow_thresh_max = {} must be below rain_thresh_min = {}",
                    snow_max, rain_min
                ),
            ));
        }
        Ok(Self::LinearRamp { snow_max, rain_min })
    }

    /// Build from a configuration method code (1 = threshold, 2 = linear ramp).
    /// Only the thresholds of the selected method are validated.
    pub fn from_code(code: i64, rs_thresh: f64, snow_max: f64, rain_min: f64) -> SnowResult<Self> {
        match code {
            RS_METHOD_THRESHOLD => Self::threshold(rs_thresh),
            RS_METHOD_LINEAR_RAMP => Self::linear_ramp(snow_max, rain_min),
            other => Err(SnowError::invalid(
                "rs_method",
                format!("unknown rain-snow partitioning method {}", other),
            )),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Threshold { .. } => RS_METHOD_THRESHOLD,
            Self::LinearRamp { .. } => RS_METHOD_LINEAR_RAMP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub rain_snow: RainSnowMethod,
    /// Maximum annual degree-day factor [mm/C/day].
    pub ddf_max: f64,
    /// Minimum annual degree-day factor [mm/C/day].
    pub ddf_min: f64,
    /// Air temperature above which snow can melt [C].
    pub tair_melt_thresh: f64,
}

impl Parameters {
    pub fn new(
        rain_snow: RainSnowMethod,
        ddf_max: f64,
        ddf_min: f64,
        tair_melt_thresh: f64,
    ) -> SnowResult<Self> {
        let values = [ddf_max, ddf_min, tair_melt_thresh];
        for ((&name, &(lo, hi)), value) in PARAM_NAMES.iter().zip(PARAM_BOUNDS).zip(values) {
            // NaN fails the range check too.
            if !(lo..=hi).contains(&value) {
                return Err(SnowError::invalid(
                    name,
                    format!("{} = {} is out of bounds [{}, {}]", name, value, lo, hi),
                ));
            }
        }
        if ddf_min > ddf_max {
            return Err(SnowError::invalid(
                "ddf_min",
                format!("ddf_min = {} exceeds ddf_max = {}", ddf_min, ddf_max),
            ));
        }
        Ok(Self {
            rain_snow,
            ddf_max,
            ddf_min,
            tair_melt_thresh,
        })
    }

    /// Mean of the annual degree-day factor cycle.
    pub fn ddf_midpoint(&self) -> f64 {
        (self.ddf_max + self.ddf_min) / 2.0
    }

    /// Amplitude of the annual degree-day factor cycle.
    pub fn ddf_halfrange(&self) -> f64 {
        (self.ddf_max - self.ddf_min) / 2.0
    }

    /// Numeric parameters in PARAM_NAMES order.
    pub fn to_array(&self) -> [f64; N_PARAMS] {
        [self.ddf_max, self.ddf_min, self.tair_melt_thresh]
    }
}
