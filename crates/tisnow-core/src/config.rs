//! Model configuration.
//!
//! A flat, serde-backed bundle of constructor parameters, loadable from YAML.
//! Every key is optional; missing keys take the model defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::error::{SnowError, SnowResult};
use crate::snow::constants::{
    DEFAULT_DAY_OF_YEAR, DEFAULT_DDF_MAX, DEFAULT_DDF_MIN, DEFAULT_RAIN_THRESH_MIN,
    DEFAULT_RS_THRESH, DEFAULT_SNOW_THRESH_MAX, DEFAULT_TAIR_MELT_THRESH, DEFAULT_YEAR,
    RS_METHOD_THRESHOLD, SECONDS_PER_DAY,
};
use crate::snow::params::{Parameters, RainSnowMethod};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rain/snow partitioning method: 1 = threshold, 2 = linear ramp.
    pub rs_method: i64,
    /// Rain/snow threshold [C] for method 1.
    pub rs_thresh: f64,
    /// All-snow upper bound [C] for method 2.
    pub snow_thresh_max: f64,
    /// All-rain lower bound [C] for method 2.
    pub rain_thresh_min: f64,
    pub ddf_max: f64,
    pub ddf_min: f64,
    pub tair_melt_thresh: f64,
    /// Initial snow water equivalent [mm], applied to every cell.
    pub swe_init: f64,
    pub dayofyear: u16,
    pub year: i32,
    /// Step length [s].
    pub time_step: f64,
    pub n_cells: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rs_method: RS_METHOD_THRESHOLD,
            rs_thresh: DEFAULT_RS_THRESH,
            snow_thresh_max: DEFAULT_SNOW_THRESH_MAX,
            rain_thresh_min: DEFAULT_RAIN_THRESH_MIN,
            ddf_max: DEFAULT_DDF_MAX,
            ddf_min: DEFAULT_DDF_MIN,
            tair_melt_thresh: DEFAULT_TAIR_MELT_THRESH,
            swe_init: 0.0,
            dayofyear: DEFAULT_DAY_OF_YEAR,
            year: DEFAULT_YEAR,
            time_step: SECONDS_PER_DAY,
            n_cells: 1,
        }
    }
}

/// Starting conditions derived from a `Config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialConditions {
    pub swe_init: f64,
    pub calendar: Calendar,
    pub time_step: f64,
    pub n_cells: usize,
}

impl InitialConditions {
    pub fn new(swe_init: f64, calendar: Calendar, time_step: f64, n_cells: usize) -> SnowResult<Self> {
        if !(swe_init.is_finite() && swe_init >= 0.0) {
            return Err(SnowError::invalid(
                "swe_init",
                format!("{} must be finite and non-negative", swe_init),
            ));
        }
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(SnowError::invalid(
                "time_step",
                format!("{} must be finite and positive", time_step),
            ));
        }
        if n_cells == 0 {
            return Err(SnowError::invalid("n_cells", "at least one cell is required"));
        }
        Ok(Self {
            swe_init,
            calendar,
            time_step,
            n_cells,
        })
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> SnowResult<Self> {
        serde_yaml::from_str(text).map_err(|e| SnowError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> SnowResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SnowError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> SnowResult<String> {
        serde_yaml::to_string(self).map_err(|e| SnowError::Config(e.to_string()))
    }

    pub fn validate(&self) -> SnowResult<()> {
        self.resolve().map(|_| ())
    }

    /// Split into validated parameters and initial conditions.
    pub fn resolve(&self) -> SnowResult<(Parameters, InitialConditions)> {
        let rain_snow = RainSnowMethod::from_code(
            self.rs_method,
            self.rs_thresh,
            self.snow_thresh_max,
            self.rain_thresh_min,
        )?;
        let params = Parameters::new(rain_snow, self.ddf_max, self.ddf_min, self.tair_melt_thresh)?;

        let calendar = Calendar::new(self.dayofyear, self.year)?;
        let init = InitialConditions::new(self.swe_init, calendar, self.time_step, self.n_cells)?;
        Ok((params, init))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let (params, init) = Config::default().resolve().unwrap();
        assert_eq!(params.rain_snow, RainSnowMethod::Threshold { rs_thresh: 2.5 });
        assert_eq!(params.ddf_max, 1.0);
        assert_eq!(init.calendar, Calendar::new(274, 2016).unwrap());
        assert_eq!(init.time_step, 86_400.0);
        assert_eq!(init.n_cells, 1);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml_str("rs_method: 2\nswe_init: 12.5\nyear: 2020\n").unwrap();
        assert_eq!(cfg.rs_method, 2);
        assert_eq!(cfg.swe_init, 12.5);
        assert_eq!(cfg.year, 2020);
        assert_eq!(cfg.rain_thresh_min, 4.5);

        let (params, _) = cfg.resolve().unwrap();
        assert_eq!(params.rain_snow, RainSnowMethod::LinearRamp { snow_max: 1.5, rain_min: 4.5 });
    }

    #[test]
    fn empty_mapping_is_default() {
        assert_eq!(Config::from_yaml_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = Config::from_yaml_str("rs_methd: 2\n").unwrap_err();
        assert!(matches!(err, SnowError::Config(_)));
    }

    #[test]
    fn bad_method_code_rejected() {
        let cfg = Config {
            rs_method: 7,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SnowError::InvalidParameter { name: "rs_method", .. })
        ));
    }

    #[test]
    fn out_of_range_method_code_is_a_parameter_error() {
        for text in ["rs_method: 300\n", "rs_method: -1\n"] {
            let cfg = Config::from_yaml_str(text).unwrap();
            assert!(matches!(
                cfg.validate(),
                Err(SnowError::InvalidParameter { name: "rs_method", .. })
            ));
        }
    }

    #[test]
    fn bad_initial_conditions_rejected() {
        let negative_swe = Config {
            swe_init: -1.0,
            ..Config::default()
        };
        assert!(negative_swe.validate().is_err());

        let zero_step = Config {
            time_step: 0.0,
            ..Config::default()
        };
        assert!(zero_step.validate().is_err());

        let no_cells = Config {
            n_cells: 0,
            ..Config::default()
        };
        assert!(no_cells.validate().is_err());

        let leap_day_in_common_year = Config {
            dayofyear: 366,
            year: 2017,
            ..Config::default()
        };
        assert!(leap_day_in_common_year.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let cfg = Config {
            rs_method: 2,
            ddf_max: 3.0,
            ddf_min: 1.0,
            ..Config::default()
        };
        let text = cfg.to_yaml().unwrap();
        assert_eq!(Config::from_yaml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "swe_init: 10.0\ndayofyear: 81").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.swe_init, 10.0);
        assert_eq!(cfg.dayofyear, 81);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = Config::load("/nonexistent/snow.yaml").unwrap_err();
        assert!(matches!(err, SnowError::Config(_)));
    }
}
