//! The no-show estimator seam.
//!
//! The engine never computes no-show risk itself. Callers inject a
//! [`NoShowEstimator`] per call; when it fails, [`resolve_risk`] substitutes a
//! fallback risk so scheduling keeps working.

use crate::error::{Result, SlotError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Hour assumed when neither the features nor a start time give one.
pub const DEFAULT_APPOINTMENT_HOUR: u32 = 12;

/// Risk assumed when no estimate is available.
pub const DEFAULT_FALLBACK_RISK: f64 = 0.0;

/// Features describing a booked appointment and its patient, as consumed by a
/// no-show model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentFeatures {
    pub patient_age: u32,
    pub patient_gender: String,
    pub appointment_type: String,
    /// Hour of day (0-23) the appointment starts. Filled from the booked start
    /// time when the caller leaves it out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_hour: Option<u32>,
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub appointment_day: u32,
    pub days_until_appointment: i64,
    pub previous_no_show_rate: f64,
    pub appointment_count: u32,
}

impl Default for AppointmentFeatures {
    fn default() -> Self {
        Self {
            patient_age: 30,
            patient_gender: "unknown".to_string(),
            appointment_type: "in-person".to_string(),
            appointment_hour: None,
            appointment_day: 1,
            days_until_appointment: 7,
            previous_no_show_rate: 0.0,
            appointment_count: 0,
        }
    }
}

/// Source of no-show probabilities.
///
/// Implementations return a probability in `[0, 1]`, or
/// `SlotError::EstimatorUnavailable` when the model cannot answer.
pub trait NoShowEstimator: Send + Sync {
    fn estimate(&self, features: &AppointmentFeatures) -> Result<f64>;
}

impl<F> NoShowEstimator for F
where
    F: Fn(&AppointmentFeatures) -> Result<f64> + Send + Sync,
{
    fn estimate(&self, features: &AppointmentFeatures) -> Result<f64> {
        self(features)
    }
}

/// Rule-based estimator used when no trained model is deployed.
///
/// Starts from the patient's historical no-show rate and adds fixed bumps for
/// off-hours (before 9 or after 16), weekend days, and bookings more than two
/// weeks out.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    pub const OFF_HOURS_BUMP: f64 = 0.1;
    pub const WEEKEND_BUMP: f64 = 0.1;
    pub const FAR_BOOKING_BUMP: f64 = 0.05;
    pub const FAR_BOOKING_DAYS: i64 = 14;
}

impl NoShowEstimator for HeuristicEstimator {
    fn estimate(&self, features: &AppointmentFeatures) -> Result<f64> {
        let mut risk = if features.previous_no_show_rate.is_finite() {
            features.previous_no_show_rate
        } else {
            DEFAULT_FALLBACK_RISK
        };
        let hour = features.appointment_hour.unwrap_or(DEFAULT_APPOINTMENT_HOUR);
        if !(9..=16).contains(&hour) {
            risk += Self::OFF_HOURS_BUMP;
        }
        if features.appointment_day == 0 || features.appointment_day == 6 {
            risk += Self::WEEKEND_BUMP;
        }
        if features.days_until_appointment > Self::FAR_BOOKING_DAYS {
            risk += Self::FAR_BOOKING_BUMP;
        }
        Ok(risk.clamp(0.0, 1.0))
    }
}

/// An estimator that always reports itself unavailable.
///
/// Stands in for a model that failed to load.
#[derive(Debug, Clone, Default)]
pub struct UnavailableEstimator {
    pub reason: String,
}

impl NoShowEstimator for UnavailableEstimator {
    fn estimate(&self, _features: &AppointmentFeatures) -> Result<f64> {
        Err(SlotError::EstimatorUnavailable(self.reason.clone()))
    }
}

/// Ask `estimator` for a risk, falling back to `fallback` if it fails or
/// returns a non-finite value. The result is clamped into `[0, 1]`.
pub fn resolve_risk<E>(estimator: &E, features: &AppointmentFeatures, fallback: f64) -> f64
where
    E: NoShowEstimator + ?Sized,
{
    match estimator.estimate(features) {
        Ok(risk) if risk.is_finite() => risk.clamp(0.0, 1.0),
        Ok(risk) => {
            warn!(risk, fallback, "estimator returned a non-finite risk; using fallback");
            fallback
        }
        Err(err) => {
            warn!(error = %err, fallback, "no-show estimator failed; using fallback");
            fallback
        }
    }
}
