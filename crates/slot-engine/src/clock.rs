//! Time-of-day helpers shared by the window sweep and the wire layer.
//!
//! All arithmetic stays inside a single day: an addition that would wrap past
//! midnight yields `None` instead of silently starting over at 00:00.

use crate::error::{Result, SlotError};
use chrono::{Duration, NaiveTime};

const HHMM: &str = "%H:%M";

/// Parse an `HH:MM` string into a time of day.
///
/// # Errors
/// Returns `SlotError::InvalidTime` if the string is not a valid 24-hour `HH:MM`.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), HHMM).map_err(|_| SlotError::InvalidTime(s.to_string()))
}

/// Format a time of day as `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format(HHMM).to_string()
}

/// Add `minutes` to `t`, returning `None` if the result would leave the day.
pub fn add_minutes(t: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let (shifted, overflow) = t.overflowing_add_signed(Duration::try_minutes(minutes)?);
    if overflow == 0 {
        Some(shifted)
    } else {
        None
    }
}

/// Signed number of whole minutes from `from` to `to`.
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    to.signed_duration_since(from).num_minutes()
}

/// Absolute distance between two times of day, keeping sub-minute precision.
pub fn gap(a: NaiveTime, b: NaiveTime) -> Duration {
    a.signed_duration_since(b).abs()
}

