//! Error type shared by every tisnow operation.

use thiserror::Error;

pub type SnowResult<T> = Result<T, SnowError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnowError {
    /// A parameter or initial condition is outside its valid range, or the
    /// rain/snow method code is unknown.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Time control asked to move backwards, or by a fraction outside [0, 1].
    #[error("invalid time target {target} (current time {current})")]
    InvalidTarget { target: f64, current: f64 },

    #[error("model is not initialized")]
    NotInitialized,

    /// Grid topology the scalar grid cannot describe.
    #[error("unsupported grid query: {0}")]
    UnsupportedQuery(&'static str),

    #[error("unknown grid id: {0}")]
    UnknownGrid(i32),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("size mismatch for {name}: expected {expected}, got {actual}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid forcing: {0}")]
    Forcing(String),
}

impl SnowError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SnowError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
