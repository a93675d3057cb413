//! Simulation calendar.
//!
//! Tracks (day of year, year) and rolls over once per completed step. Leap
//! years use the plain four-year rule, so 2100 counts as a leap year.

use crate::error::{SnowError, SnowResult};
use crate::snow::constants::{DEFAULT_DAY_OF_YEAR, DEFAULT_YEAR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    day_of_year: u16,
    year: i32,
}

/// Four-year leap rule, without the century exceptions.
pub fn is_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

pub fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            day_of_year: DEFAULT_DAY_OF_YEAR,
            year: DEFAULT_YEAR,
        }
    }
}

impl Calendar {
    pub fn new(day_of_year: u16, year: i32) -> SnowResult<Self> {
        let last = days_in_year(year);
        if !(1..=last).contains(&day_of_year) {
            return Err(SnowError::invalid(
                "dayofyear",
                format!("day {} is outside 1..={} for year {}", day_of_year, last, year),
            ));
        }
        Ok(Self { day_of_year, year })
    }

    pub fn day_of_year(&self) -> u16 {
        self.day_of_year
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Move to the next day. Returns `true` when a new year begins.
    pub fn advance(&mut self) -> bool {
        match self.day_of_year {
            365 if is_leap_year(self.year) => {
                self.day_of_year = 366;
                false
            }
            365 | 366 => {
                self.day_of_year = 1;
                self.year += 1;
                true
            }
            _ => {
                self.day_of_year += 1;
                false
            }
        }
    }
}
