//! JSON request/response shapes for the transport layer.
//!
//! Times cross the boundary as `HH:MM` strings and field names are camelCase;
//! everything inside the engine uses [`NaiveTime`](chrono::NaiveTime).

use crate::clock;
use crate::error::{Result, SlotError};
use crate::estimator::AppointmentFeatures;
use crate::occupancy::{ClassifiedAppointment, Occupancy};
use crate::optimizer::PendingAppointment;
use crate::scorer::SlotCandidate;
use crate::window::WorkingWindow;
use chrono::Timelike;
use serde::{Deserialize, Serialize};

fn default_start_time() -> String {
    "09:00".to_string()
}

fn default_end_time() -> String {
    "17:00".to_string()
}

fn default_duration() -> i64 {
    30
}

/// A request to rank open slots for one provider's day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_duration")]
    pub appointment_duration: i64,
    /// Sweep step; defaults to `appointment_duration`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_minutes: Option<i64>,
    #[serde(default)]
    pub existing_appointments: Vec<AppointmentEntry>,
}

/// An existing appointment as sent by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentEntry {
    pub id: String,
    pub start_time: String,
    /// Defaults to the request's `appointment_duration`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_show_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<AppointmentFeatures>,
}

impl ScheduleRequest {
    /// Parse the working window.
    ///
    /// # Errors
    /// `SlotError::InvalidTime` for unparseable times, `SlotError::InvalidWindow`
    /// for inverted bounds or a non-positive duration or step.
    pub fn window(&self) -> Result<WorkingWindow> {
        let start = clock::parse_hhmm(&self.start_time)?;
        let end = clock::parse_hhmm(&self.end_time)?;
        WorkingWindow::new(
            start,
            end,
            self.appointment_duration,
            self.step_minutes.unwrap_or(self.appointment_duration),
        )
    }

    /// Convert the existing appointments, keeping any risk the caller supplied.
    ///
    /// Features without an `appointmentHour` take the hour of the entry's
    /// `startTime`.
    ///
    /// # Errors
    /// `SlotError::InvalidAppointment` naming the appointment whose start time
    /// does not parse.
    pub fn pending_appointments(&self) -> Result<Vec<PendingAppointment>> {
        self.existing_appointments
            .iter()
            .map(|entry| {
                let start = clock::parse_hhmm(&entry.start_time).map_err(|_| {
                    SlotError::InvalidAppointment {
                        id: entry.id.clone(),
                        reason: format!("start time '{}' is not HH:MM", entry.start_time),
                    }
                })?;
                let features = entry.features.clone().map(|mut features| {
                    features.appointment_hour = features.appointment_hour.or(Some(start.hour()));
                    features
                });
                Ok(PendingAppointment {
                    id: entry.id.clone(),
                    start,
                    duration_minutes: entry.duration.unwrap_or(self.appointment_duration),
                    risk: entry.no_show_probability,
                    features,
                })
            })
            .collect()
    }
}

/// One ranked slot in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub start_time: String,
    pub end_time: String,
    pub optimality_score: f64,
}

impl From<&SlotCandidate> for SlotEntry {
    fn from(c: &SlotCandidate) -> Self {
        Self {
            start_time: clock::format_hhmm(c.start),
            end_time: clock::format_hhmm(c.end),
            optimality_score: c.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub doctor_id: String,
    pub available_slots: Vec<SlotEntry>,
}

impl ScheduleResponse {
    /// Encode ranked candidates, preserving their order.
    pub fn new(doctor_id: impl Into<String>, candidates: &[SlotCandidate]) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            available_slots: candidates.iter().map(SlotEntry::from).collect(),
        }
    }
}

/// How one existing appointment was classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationEntry {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub no_show_probability: f64,
    pub occupancy: Occupancy,
}

impl From<&ClassifiedAppointment<'_>> for ClassificationEntry {
    fn from(c: &ClassifiedAppointment<'_>) -> Self {
        Self {
            id: c.appointment.id.clone(),
            start_time: clock::format_hhmm(c.appointment.start),
            end_time: clock::format_hhmm(c.appointment.end),
            no_show_probability: c.risk,
            occupancy: c.occupancy,
        }
    }
}
