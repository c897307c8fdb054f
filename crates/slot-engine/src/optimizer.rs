//! End-to-end schedule optimization: validate, classify, sweep, rank.

use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::estimator::{resolve_risk, AppointmentFeatures, NoShowEstimator};
use crate::occupancy::{classify, ExistingAppointment};
use crate::scorer::{generate_slots, SlotCandidate};
use crate::window::WorkingWindow;
use chrono::{NaiveTime, Timelike};
use tracing::debug;

/// Rank the open slots of `window` given the provider's existing appointments.
///
/// Each call is independent: nothing is cached and `appointments` is only read.
///
/// # Errors
/// - `SlotError::InvalidConfig` if `config` fails validation.
/// - `SlotError::InvalidWindow` if the window is malformed.
/// - `SlotError::InvalidAppointment` naming the first malformed appointment.
pub fn optimize_schedule(
    window: &WorkingWindow,
    appointments: &[ExistingAppointment],
    config: &OptimizerConfig,
) -> Result<Vec<SlotCandidate>> {
    config.validate()?;
    window.validate()?;
    let classified = classify(appointments, config.reclaim_threshold)?;
    generate_slots(window, &classified, config)
}

/// An existing appointment whose no-show risk may still need estimating.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAppointment {
    pub id: String,
    pub start: NaiveTime,
    pub duration_minutes: i64,
    /// A risk already known to the caller. Takes precedence over `features`.
    pub risk: Option<f64>,
    pub features: Option<AppointmentFeatures>,
}

/// Turn pending appointments into [`ExistingAppointment`]s, asking `estimator`
/// for any risk the caller did not supply.
///
/// An appointment with neither a risk nor features, or whose estimate fails,
/// gets `fallback_risk`. Features without an hour are estimated at the hour of
/// the appointment's start.
///
/// # Errors
/// Returns `SlotError::InvalidAppointment` if a duration is not positive or an
/// appointment runs past midnight.
pub fn resolve_appointments<E>(
    pending: &[PendingAppointment],
    estimator: &E,
    fallback_risk: f64,
) -> Result<Vec<ExistingAppointment>>
where
    E: NoShowEstimator + ?Sized,
{
    pending
        .iter()
        .map(|p| {
            let risk = match (p.risk, &p.features) {
                (Some(risk), _) => risk,
                (None, Some(features)) if features.appointment_hour.is_none() => {
                    let features = AppointmentFeatures {
                        appointment_hour: Some(p.start.hour()),
                        ..features.clone()
                    };
                    resolve_risk(estimator, &features, fallback_risk)
                }
                (None, Some(features)) => resolve_risk(estimator, features, fallback_risk),
                (None, None) => {
                    debug!(id = %p.id, fallback_risk, "no risk or features supplied");
                    fallback_risk
                }
            };
            ExistingAppointment::new(p.id.clone(), p.start, p.duration_minutes, risk)
        })
        .collect()
}

/// Like [`optimize_schedule`], but estimates missing risks first.
///
/// Estimator failures never fail the call; see [`resolve_appointments`].
pub fn optimize_with_estimator<E>(
    window: &WorkingWindow,
    pending: &[PendingAppointment],
    estimator: &E,
    config: &OptimizerConfig,
) -> Result<Vec<SlotCandidate>>
where
    E: NoShowEstimator + ?Sized,
{
    config.validate()?;
    window.validate()?;
    let appointments = resolve_appointments(pending, estimator, config.fallback_risk)?;
    optimize_schedule(window, &appointments, config)
}
