//! Tests for the estimator seam: heuristic estimator and fallback resolution.

use slot_engine::estimator::{
    resolve_risk, AppointmentFeatures, HeuristicEstimator, NoShowEstimator, UnavailableEstimator,
};
use slot_engine::error::Result;
use slot_engine::SlotError;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn weekday_morning(rate: f64) -> AppointmentFeatures {
    AppointmentFeatures {
        appointment_hour: Some(10),
        appointment_day: 2,
        days_until_appointment: 3,
        previous_no_show_rate: rate,
        ..AppointmentFeatures::default()
    }
}

// ── HeuristicEstimator ──────────────────────────────────────────────────────

#[test]
fn heuristic_starts_from_history() {
    let risk = HeuristicEstimator.estimate(&weekday_morning(0.35)).unwrap();
    assert_close(risk, 0.35);
}

#[test]
fn heuristic_defaults_to_zero_for_new_patient() {
    let risk = HeuristicEstimator
        .estimate(&AppointmentFeatures::default())
        .unwrap();
    assert_eq!(risk, 0.0);
}

#[test]
fn heuristic_adds_every_bump() {
    let features = AppointmentFeatures {
        appointment_hour: Some(8),
        appointment_day: 6,
        days_until_appointment: 20,
        previous_no_show_rate: 0.2,
        ..AppointmentFeatures::default()
    };
    let risk = HeuristicEstimator.estimate(&features).unwrap();
    assert_close(risk, 0.2 + 0.1 + 0.1 + 0.05);
}

#[test]
fn heuristic_off_hours_boundaries() {
    let at = |hour| {
        HeuristicEstimator
            .estimate(&AppointmentFeatures {
                appointment_hour: Some(hour),
                ..weekday_morning(0.0)
            })
            .unwrap()
    };
    assert_close(at(8), 0.1);
    assert_eq!(at(9), 0.0);
    assert_eq!(at(16), 0.0);
    assert_close(at(17), 0.1);
}

#[test]
fn heuristic_sunday_counts_as_weekend() {
    let features = AppointmentFeatures {
        appointment_day: 0,
        ..weekday_morning(0.0)
    };
    assert_close(HeuristicEstimator.estimate(&features).unwrap(), 0.1);
}

#[test]
fn heuristic_is_clamped_to_one() {
    let features = AppointmentFeatures {
        appointment_hour: Some(18),
        appointment_day: 6,
        days_until_appointment: 30,
        previous_no_show_rate: 0.95,
        ..AppointmentFeatures::default()
    };
    assert_eq!(HeuristicEstimator.estimate(&features).unwrap(), 1.0);
}

// ── resolve_risk ────────────────────────────────────────────────────────────

#[test]
fn unavailable_estimator_reports_error() {
    let estimator = UnavailableEstimator {
        reason: "model not loaded".to_string(),
    };
    assert_eq!(
        estimator.estimate(&AppointmentFeatures::default()),
        Err(SlotError::EstimatorUnavailable("model not loaded".to_string()))
    );
}

#[test]
fn failure_resolves_to_fallback() {
    let estimator = UnavailableEstimator::default();
    let risk = resolve_risk(&estimator, &AppointmentFeatures::default(), 0.25);
    assert_eq!(risk, 0.25);
}

#[test]
fn closure_estimators_are_accepted() {
    let fixed = |_: &AppointmentFeatures| -> Result<f64> { Ok(0.42) };
    assert_eq!(resolve_risk(&fixed, &AppointmentFeatures::default(), 0.0), 0.42);
}

#[test]
fn non_finite_estimate_resolves_to_fallback() {
    let broken = |_: &AppointmentFeatures| -> Result<f64> { Ok(f64::NAN) };
    assert_eq!(resolve_risk(&broken, &AppointmentFeatures::default(), 0.1), 0.1);
}

#[test]
fn out_of_range_estimate_is_clamped() {
    let eager = |_: &AppointmentFeatures| -> Result<f64> { Ok(1.7) };
    assert_eq!(resolve_risk(&eager, &AppointmentFeatures::default(), 0.0), 1.0);
}

#[test]
fn estimator_works_through_trait_object() {
    let boxed: Box<dyn NoShowEstimator> = Box::new(HeuristicEstimator);
    let risk = resolve_risk(boxed.as_ref(), &weekday_morning(0.5), 0.0);
    assert_close(risk, 0.5);
}

#[test]
fn features_deserialize_with_defaults() {
    let features: AppointmentFeatures =
        serde_json::from_str(r#"{"previousNoShowRate":0.3,"appointmentHour":15}"#).unwrap();

    assert_eq!(features.previous_no_show_rate, 0.3);
    assert_eq!(features.appointment_hour, Some(15));
    assert_eq!(features.days_until_appointment, 7);
    assert_eq!(features.appointment_type, "in-person");
}
