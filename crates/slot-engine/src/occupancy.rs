//! Occupancy resolution -- decide which existing appointments genuinely block
//! their interval and which may be re-offered because the patient is likely
//! not to show.
//!
//! Appointments are classified independently. Overlapping or identical
//! intervals are never merged, and the caller's list is only borrowed.

use crate::clock;
use crate::error::{Result, SlotError};
use crate::estimator::DEFAULT_FALLBACK_RISK;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An appointment already on the provider's book for the day.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingAppointment {
    pub id: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Estimated probability in `[0, 1]` that the patient will not show.
    pub no_show_risk: f64,
}

impl ExistingAppointment {
    /// Build an appointment from its start and duration, deriving `end` once.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidAppointment` if the duration is not positive
    /// or the appointment would run past midnight.
    pub fn new(
        id: impl Into<String>,
        start: NaiveTime,
        duration_minutes: i64,
        no_show_risk: f64,
    ) -> Result<Self> {
        let id = id.into();
        if duration_minutes <= 0 {
            return Err(SlotError::InvalidAppointment {
                id,
                reason: format!("duration must be positive, got {duration_minutes}"),
            });
        }
        let end = clock::add_minutes(start, duration_minutes).ok_or_else(|| {
            SlotError::InvalidAppointment {
                id: id.clone(),
                reason: format!(
                    "{} + {} minutes runs past midnight",
                    clock::format_hhmm(start),
                    duration_minutes
                ),
            }
        })?;
        Ok(Self {
            id,
            start,
            end,
            no_show_risk,
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        clock::minutes_between(self.start, self.end)
    }
}

/// Whether an appointment holds its interval for the current call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    /// Risk below the reclaim threshold: the interval is occupied.
    Blocking,
    /// Risk at or above the threshold: the interval may be offered again.
    Reclaimable,
}

/// An appointment tagged with its occupancy for one optimization call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedAppointment<'a> {
    pub appointment: &'a ExistingAppointment,
    /// The appointment's risk after clamping into `[0, 1]`.
    pub risk: f64,
    pub occupancy: Occupancy,
}

impl ClassifiedAppointment<'_> {
    pub fn is_blocking(&self) -> bool {
        self.occupancy == Occupancy::Blocking
    }

    /// Half-open overlap: touching intervals do not overlap.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.appointment.end && end > self.appointment.start
    }
}

/// Clamp a raw risk into `[0, 1]`. NaN becomes [`DEFAULT_FALLBACK_RISK`].
pub fn clamp_risk(raw: f64) -> f64 {
    if raw.is_nan() {
        DEFAULT_FALLBACK_RISK
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Classify each appointment as blocking or reclaimable.
///
/// An appointment is `Blocking` when its clamped risk is below
/// `reclaim_threshold` and `Reclaimable` otherwise. Output order matches input
/// order.
///
/// # Errors
/// Returns `SlotError::InvalidAppointment` for the first appointment whose
/// `start` is not before its `end`. Malformed appointments are never skipped.
pub fn classify(
    appointments: &[ExistingAppointment],
    reclaim_threshold: f64,
) -> Result<Vec<ClassifiedAppointment<'_>>> {
    appointments
        .iter()
        .map(|appointment| {
            if appointment.start >= appointment.end {
                return Err(SlotError::InvalidAppointment {
                    id: appointment.id.clone(),
                    reason: format!(
                        "start {} is not before end {}",
                        clock::format_hhmm(appointment.start),
                        clock::format_hhmm(appointment.end)
                    ),
                });
            }

            let risk = clamp_risk(appointment.no_show_risk);
            if risk != appointment.no_show_risk {
                warn!(
                    id = %appointment.id,
                    raw = appointment.no_show_risk,
                    clamped = risk,
                    "no-show risk outside [0, 1]; clamped"
                );
            }

            let occupancy = if risk < reclaim_threshold {
                Occupancy::Blocking
            } else {
                Occupancy::Reclaimable
            };

            Ok(ClassifiedAppointment {
                appointment,
                risk,
                occupancy,
            })
        })
        .collect()
}
