//! Degree-day snow accumulation and melt.
//!
//! Partitions precipitation into rain and snow, accumulates the pack and
//! melts it with a seasonally varying degree-day factor.

pub mod constants;
pub mod params;
pub mod processes;
pub mod run;
pub mod state;
