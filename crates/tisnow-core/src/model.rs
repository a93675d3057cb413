//! Model controller.
//!
//! Owns parameters, per-cell state and the calendar, and advances them
//! together. Each instance is independent; run as many as needed.

use log::{debug, trace};

use crate::calendar::Calendar;
use crate::config::{Config, InitialConditions};
use crate::error::{SnowError, SnowResult};
use crate::snow::params::Parameters;
use crate::snow::run::solve;
use crate::snow::state::State;

#[derive(Debug, Clone)]
pub struct SnowModel {
    params: Parameters,
    state: State,
    calendar: Calendar,
    /// Elapsed simulated time [s].
    time: f64,
    /// Nominal step length [s].
    time_step: f64,
}

impl SnowModel {
    pub fn new(params: Parameters, init: InitialConditions) -> Self {
        debug!(
            "snow model: {} cell(s), swe_init={} mm, day {} of {}, step {} s",
            init.n_cells,
            init.swe_init,
            init.calendar.day_of_year(),
            init.calendar.year(),
            init.time_step
        );
        Self {
            params,
            state: State::initialize(init.n_cells, init.swe_init),
            calendar: init.calendar,
            time: 0.0,
            time_step: init.time_step,
        }
    }

    pub fn from_config(config: &Config) -> SnowResult<Self> {
        let (params, init) = config.resolve()?;
        Ok(Self::new(params, init))
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Mutable state for the exchange layer, the only writer besides the solver.
    pub(crate) fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn day_of_year(&self) -> u16 {
        self.calendar.day_of_year()
    }

    pub fn year(&self) -> i32 {
        self.calendar.year()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn n_cells(&self) -> usize {
        self.state.n_cells()
    }

    /// Solve on the current day, move the calendar on, add one step to time.
    pub fn advance_one_step(&mut self) {
        self.advance_by(self.time_step);
    }

    /// Same as `advance_one_step`, but time moves by `frac` of a step.
    ///
    /// The solver and calendar still run once.
    pub fn advance_by_fraction(&mut self, frac: f64) -> SnowResult<()> {
        if !(0.0..=1.0).contains(&frac) {
            return Err(SnowError::InvalidTarget {
                target: self.time + frac * self.time_step,
                current: self.time,
            });
        }
        self.advance_by(frac * self.time_step);
        Ok(())
    }

    /// Run whole steps up to `target`, then one fractional step onto it.
    pub fn advance_until(&mut self, target: f64) -> SnowResult<()> {
        if !target.is_finite() || target < self.time {
            return Err(SnowError::InvalidTarget {
                target,
                current: self.time,
            });
        }
        let n_steps = (target - self.time) / self.time_step;
        let whole = n_steps.floor();
        let frac = n_steps - whole;
        debug!(
            "advancing from {} s to {} s: {} whole step(s) + {:.6}",
            self.time, target, whole, frac
        );

        for _ in 0..whole as u64 {
            self.advance_one_step();
        }
        self.advance_by(frac * self.time_step);
        Ok(())
    }

    fn advance_by(&mut self, dt: f64) {
        solve(&mut self.state, &self.params, self.calendar.day_of_year());
        if self.calendar.advance() {
            debug!("new simulation year {}", self.calendar.year());
        }
        self.time += dt;
        trace!(
            "t={} s, day {} of {}, swe={:?}",
            self.time,
            self.calendar.day_of_year(),
            self.calendar.year(),
            self.state.swe.as_slice()
        );
    }
}
