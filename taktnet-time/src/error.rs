use thiserror::Error;

use taktnet_core::NetError;

/// Errors raised by the timing overlay.
#[derive(Debug, Error, PartialEq)]
pub enum ClockError {
    /// A running timer was found past its `max_time` while applying an
    /// advance. Fatal: the advance aborts without mutating any timer.
    #[error("transition '{transition}' overran its window (elapsed {elapsed} > max_time {max_time})")]
    Overrun {
        transition: String,
        elapsed: f64,
        max_time: f64,
    },

    #[error("invalid firing window: min_time {min}, max_time {max:?}")]
    InvalidWindow { min: f64, max: Option<f64> },

    #[error("advance step must be non-negative, got {0}")]
    NegativeStep(f64),

    #[error("transition '{transition}' is not enabled")]
    NotEnabled { transition: String },

    #[error(transparent)]
    Net(#[from] NetError),
}
