/// Degree-day snow model state.
///
/// One value per independent cell for each field. Inputs (`temperature`,
/// `precipitation`) are written by the caller; `swe` and `melt` are written
/// only by the solver.
use smallvec::SmallVec;

/// Per-cell values. Most runs model a single cell, which stays inline.
pub type CellArray = SmallVec<[f64; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Air temperature [C].
    pub temperature: CellArray,
    /// Precipitation this step [mm].
    pub precipitation: CellArray,
    /// Snow water equivalent on the ground [mm].
    pub swe: CellArray,
    /// Snowmelt plus rainfall leaving the pack this step [mm].
    pub melt: CellArray,
}

impl State {
    /// Zero forcing and melt, with every cell's snowpack at `swe_init`.
    pub fn initialize(n_cells: usize, swe_init: f64) -> Self {
        Self {
            temperature: smallvec::smallvec![0.0; n_cells],
            precipitation: smallvec::smallvec![0.0; n_cells],
            swe: smallvec::smallvec![swe_init; n_cells],
            melt: smallvec::smallvec![0.0; n_cells],
        }
    }

    pub fn n_cells(&self) -> usize {
        self.swe.len()
    }

    /// Total snow water equivalent over all cells [mm].
    pub fn total_swe(&self) -> f64 {
        self.swe.iter().sum()
    }
}
