/// Degree-day snow model orchestration.
///
/// - `step()`: one cell, one timestep
/// - `solve()`: every cell of a `State`, in place
/// - `run()`: one cell over a forcing timeseries
use tisnow_macros::Fluxes;

use super::params::Parameters;
use super::processes;
use super::state::State;
use crate::calendar::Calendar;
use crate::forcing::{DailyForcing, ForcingData};
use crate::traits::{FluxSink, PointModel};

/// Fluxes from a single cell timestep.
#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
pub struct SnowFluxes {
    pub temp: f64,
    pub precip: f64,
    /// Liquid fraction of precipitation [-].
    pub ppt_phase: f64,
    pub snowfall: f64,
    pub rainfall: f64,
    /// Degree-day factor used this step [mm/C/day].
    pub ddf: f64,
    pub pot_melt: f64,
    /// Snowmelt only, bounded by the available pack.
    pub melt: f64,
    /// Snowmelt plus rainfall.
    pub outflow: f64,
    /// Snow water equivalent after the step.
    pub swe: f64,
}

/// Execute one timestep for one cell with a precomputed degree-day factor.
///
/// Returns (new_swe, fluxes).
pub fn step(swe: f64, params: &Parameters, precip: f64, temp: f64, ddf: f64) -> (f64, SnowFluxes) {
    // 1. Rain/snow partition
    let ppt_phase = processes::precip_phase(&params.rain_snow, temp);
    let (snowfall, rainfall) = processes::partition_precipitation(precip, ppt_phase);

    // 2. Accumulate
    let swe_accum = swe + snowfall;

    // 3. Melt, never more than the pack holds
    let pot_melt = processes::potential_melt(temp, params.tair_melt_thresh, ddf);
    let melt = processes::bounded_melt(swe_accum, pot_melt);
    let new_swe = swe_accum - melt;

    // 4. Rain passes straight through with the melt
    let outflow = melt + rainfall;

    let fluxes = SnowFluxes {
        temp,
        precip,
        ppt_phase,
        snowfall,
        rainfall,
        ddf,
        pot_melt,
        melt,
        outflow,
        swe: new_swe,
    };

    (new_swe, fluxes)
}

/// Advance every cell of `state` by one step on `day_of_year`.
///
/// Reads `temperature` and `precipitation`, overwrites `swe` and `melt`
/// (melt holds the total outflow: snowmelt plus rainfall).
pub fn solve(state: &mut State, params: &Parameters, day_of_year: u16) {
    let ddf = processes::degree_day_factor(params, day_of_year);
    let State {
        temperature,
        precipitation,
        swe,
        melt,
    } = state;

    for (((&temp, &precip), swe), melt) in temperature
        .iter()
        .zip(precipitation.iter())
        .zip(swe.iter_mut())
        .zip(melt.iter_mut())
    {
        let (new_swe, fluxes) = step(*swe, params, precip, temp, ddf);
        *swe = new_swe;
        *melt = fluxes.outflow;
    }
}

/// Snowpack of a single cell plus its position in the calendar.
///
/// The default is bare ground on the default start day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackState {
    pub swe: f64,
    pub calendar: Calendar,
}

/// Degree-day factor for every day of a leap year.
#[derive(Debug, Clone)]
pub struct DdfTable([f64; 366]);

impl DdfTable {
    pub fn new(params: &Parameters) -> Self {
        let mut table = [0.0; 366];
        for (doy, slot) in (1u16..).zip(table.iter_mut()) {
            *slot = processes::degree_day_factor(params, doy);
        }
        Self(table)
    }

    /// `None` outside `1..=366`.
    pub fn get(&self, day_of_year: u16) -> Option<f64> {
        let idx = usize::from(day_of_year.checked_sub(1)?);
        self.0.get(idx).copied()
    }
}

/// Single-cell degree-day model for timeseries runs.
pub struct DegreeDay;

impl FluxSink<SnowFluxes> for SnowFluxesTimeseries {
    fn with_capacity(n: usize) -> Self {
        SnowFluxesTimeseries::with_capacity(n)
    }

    fn push(&mut self, record: &SnowFluxes) {
        SnowFluxesTimeseries::push(self, record)
    }
}

impl PointModel for DegreeDay {
    type Params = Parameters;
    type State = PackState;
    type Forcing = DailyForcing;
    type Fluxes = SnowFluxes;
    type Output = SnowFluxesTimeseries;
    type Context = DdfTable;

    fn prepare(params: &Parameters) -> DdfTable {
        DdfTable::new(params)
    }

    fn step(
        state: PackState,
        params: &Parameters,
        forcing: &DailyForcing,
        context: &DdfTable,
    ) -> (PackState, SnowFluxes) {
        let doy = state.calendar.day_of_year();
        let ddf = context
            .get(doy)
            .unwrap_or_else(|| processes::degree_day_factor(params, doy));
        let (swe, fluxes) = step(state.swe, params, forcing.precip, forcing.temp, ddf);
        let mut calendar = state.calendar;
        calendar.advance();
        (PackState { swe, calendar }, fluxes)
    }
}

/// Run one cell over a forcing timeseries.
pub fn run(
    params: &Parameters,
    forcing: &ForcingData,
    initial_state: Option<&PackState>,
) -> SnowFluxesTimeseries {
    DegreeDay::run(params, forcing.iter(), initial_state)
}
