//! tisnow: temperature-index snow model.
//!
//! Daily snow accumulation and melt for independent cells, with a
//! variable-exchange (BMI) facade for coupling to forcing providers and
//! other models.

pub mod bmi;
pub mod calendar;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod forcing;
pub mod model;
pub mod snow;
pub mod traits;

pub use bmi::{Bmi, SnowBmi};
pub use config::Config;
pub use error::{SnowError, SnowResult};
pub use model::SnowModel;
