//! Exchange variable table.
//!
//! The four externally visible names, their units and the state array
//! behind each.

use crate::error::{SnowError, SnowResult};
use crate::snow::state::{CellArray, State};

pub const PRECIPITATION: &str = "atmosphere_water__precipitation_leq-volume_flux";
pub const TEMPERATURE: &str = "land_surface_air__temperature";
pub const SWE: &str = "snowpack__liquid-equivalent_depth";
pub const MELT: &str = "snowpack__melt_volume_flux";

pub const INPUT_VAR_NAMES: &[&str] = &[PRECIPITATION, TEMPERATURE];
pub const OUTPUT_VAR_NAMES: &[&str] = &[SWE, MELT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Precipitation,
    Temperature,
    Swe,
    Melt,
}

impl Variable {
    pub fn from_name(name: &str) -> SnowResult<Self> {
        match name {
            PRECIPITATION => Ok(Self::Precipitation),
            TEMPERATURE => Ok(Self::Temperature),
            SWE => Ok(Self::Swe),
            MELT => Ok(Self::Melt),
            other => Err(SnowError::UnknownVariable(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Precipitation => PRECIPITATION,
            Self::Temperature => TEMPERATURE,
            Self::Swe => SWE,
            Self::Melt => MELT,
        }
    }

    /// UDUNITS string.
    pub fn units(self) -> &'static str {
        match self {
            Self::Precipitation | Self::Melt => "mm d-1",
            Self::Temperature => "C",
            Self::Swe => "mm",
        }
    }

    /// Reject values the solver cannot take: anything non-finite, and
    /// negative depths or fluxes. Temperature may be negative.
    pub fn check_values(self, values: &[f64]) -> SnowResult<()> {
        let signed = self == Self::Temperature;
        match values.iter().find(|&&v| !v.is_finite() || (!signed && v < 0.0)) {
            Some(v) => Err(SnowError::invalid(
                self.name(),
                format!("{} is not a valid value", v),
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn field(self, state: &State) -> &CellArray {
        match self {
            Self::Precipitation => &state.precipitation,
            Self::Temperature => &state.temperature,
            Self::Swe => &state.swe,
            Self::Melt => &state.melt,
        }
    }

    pub(crate) fn field_mut(self, state: &mut State) -> &mut CellArray {
        match self {
            Self::Precipitation => &mut state.precipitation,
            Self::Temperature => &mut state.temperature,
            Self::Swe => &mut state.swe,
            Self::Melt => &mut state.melt,
        }
    }
}
