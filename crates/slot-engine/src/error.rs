//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// Working-hours bounds are inverted or the duration/step is not positive.
    #[error("Invalid window ({field}): {reason}")]
    InvalidWindow { field: &'static str, reason: String },

    /// An existing appointment has a malformed interval.
    #[error("Invalid appointment '{id}': {reason}")]
    InvalidAppointment { id: String, reason: String },

    /// The no-show estimator could not produce a risk value.
    ///
    /// Never escapes [`crate::optimize_schedule`]; callers of
    /// [`crate::estimator::resolve_risk`] get the fallback risk instead.
    #[error("No-show estimator unavailable: {0}")]
    EstimatorUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A time-of-day string was not in `HH:MM` form.
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
