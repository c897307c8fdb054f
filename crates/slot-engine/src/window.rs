//! The working-hours window that bounds one slot sweep.

use crate::clock;
use crate::error::{Result, SlotError};
use chrono::NaiveTime;

/// A provider's working window for a single day, plus the sweep geometry.
///
/// A `step_minutes` smaller than `slot_duration_minutes` produces overlapping
/// candidate starts; a step equal to the duration gives the classic grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub slot_duration_minutes: i64,
    pub step_minutes: i64,
}

impl WorkingWindow {
    /// Build a window, validating its bounds.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidWindow` if `start >= end` or if the duration
    /// or step is not positive.
    pub fn new(
        start: NaiveTime,
        end: NaiveTime,
        slot_duration_minutes: i64,
        step_minutes: i64,
    ) -> Result<Self> {
        let window = Self {
            start,
            end,
            slot_duration_minutes,
            step_minutes,
        };
        window.validate()?;
        Ok(window)
    }

    /// Check the window invariants. Fields are public, so the sweep re-checks
    /// them on every call rather than trusting construction.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(SlotError::InvalidWindow {
                field: "end",
                reason: format!(
                    "window end {} is not after start {}",
                    clock::format_hhmm(self.end),
                    clock::format_hhmm(self.start)
                ),
            });
        }
        if self.slot_duration_minutes <= 0 {
            return Err(SlotError::InvalidWindow {
                field: "slot_duration_minutes",
                reason: format!("must be positive, got {}", self.slot_duration_minutes),
            });
        }
        if self.step_minutes <= 0 {
            return Err(SlotError::InvalidWindow {
                field: "step_minutes",
                reason: format!("must be positive, got {}", self.step_minutes),
            });
        }
        Ok(())
    }

    /// Length of the window in minutes.
    pub fn span_minutes(&self) -> i64 {
        clock::minutes_between(self.start, self.end)
    }
}

