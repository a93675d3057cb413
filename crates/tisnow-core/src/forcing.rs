/// Validated daily forcing for timeseries runs.
///
/// Both arrays must have the same, non-zero length. NaN values and negative
/// precipitation are rejected.
use crate::error::{SnowError, SnowResult};

/// Forcing for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyForcing {
    /// Precipitation [mm].
    pub precip: f64,
    /// Air temperature [C].
    pub temp: f64,
}

#[derive(Debug, Clone)]
pub struct ForcingData {
    pub precip: Vec<f64>,
    pub temp: Vec<f64>,
}

impl ForcingData {
    pub fn new(precip: Vec<f64>, temp: Vec<f64>) -> SnowResult<Self> {
        if precip.is_empty() {
            return Err(SnowError::Forcing("precip array is empty".to_string()));
        }
        if precip.len() != temp.len() {
            return Err(SnowError::Forcing(format!(
                "precip length {} does not match temp length {}",
                precip.len(),
                temp.len()
            )));
        }
        if precip.iter().any(|v| v.is_nan()) {
            return Err(SnowError::Forcing("precip array contains NaN values".to_string()));
        }
        if temp.iter().any(|v| v.is_nan()) {
            return Err(SnowError::Forcing("temp array contains NaN values".to_string()));
        }
        if let Some(i) = precip.iter().position(|&v| v < 0.0) {
            return Err(SnowError::Forcing(format!(
                "precip[{}] = {} is negative",
                i, precip[i]
            )));
        }
        Ok(Self { precip, temp })
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.precip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precip.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DailyForcing> + '_ {
        self.precip
            .iter()
            .zip(&self.temp)
            .map(|(&precip, &temp)| DailyForcing { precip, temp })
    }
}
