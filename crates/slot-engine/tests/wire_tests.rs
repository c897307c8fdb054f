//! Tests for the JSON request/response shapes.

use chrono::NaiveTime;
use slot_engine::occupancy::classify;
use slot_engine::wire::{ClassificationEntry, ScheduleRequest, ScheduleResponse};
use slot_engine::{
    optimize_schedule, resolve_appointments, ExistingAppointment, HeuristicEstimator, Occupancy,
    OptimizerConfig, SlotCandidate, SlotError,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn minimal_request_uses_working_day_defaults() {
    let request: ScheduleRequest = serde_json::from_str(r#"{"doctorId":"doc-1"}"#).unwrap();
    let window = request.window().unwrap();

    assert_eq!(window.start, t(9, 0));
    assert_eq!(window.end, t(17, 0));
    assert_eq!(window.slot_duration_minutes, 30);
    assert_eq!(window.step_minutes, 30);
    assert!(request.pending_appointments().unwrap().is_empty());
}

#[test]
fn explicit_step_overrides_duration() {
    let request: ScheduleRequest = serde_json::from_str(
        r#"{"startTime":"08:00","endTime":"12:00","appointmentDuration":40,"stepMinutes":20}"#,
    )
    .unwrap();
    let window = request.window().unwrap();

    assert_eq!(window.start, t(8, 0));
    assert_eq!(window.slot_duration_minutes, 40);
    assert_eq!(window.step_minutes, 20);
}

#[test]
fn appointment_duration_defaults_to_request_duration() {
    let request: ScheduleRequest = serde_json::from_str(
        r#"{
            "appointmentDuration": 45,
            "existingAppointments": [
                {"id": "a1", "startTime": "10:00", "noShowProbability": 0.3},
                {"id": "a2", "startTime": "13:15", "duration": 20}
            ]
        }"#,
    )
    .unwrap();
    let pending = request.pending_appointments().unwrap();

    assert_eq!(pending[0].duration_minutes, 45);
    assert_eq!(pending[0].risk, Some(0.3));
    assert_eq!(pending[1].start, t(13, 15));
    assert_eq!(pending[1].duration_minutes, 20);
    assert_eq!(pending[1].risk, None);
}

#[test]
fn features_without_hour_take_the_start_time_hour() {
    let request: ScheduleRequest = serde_json::from_str(
        r#"{
            "startTime": "07:00",
            "existingAppointments": [
                {"id": "early", "startTime": "07:00", "features": {"previousNoShowRate": 0.65}},
                {"id": "pinned", "startTime": "07:30", "features": {"appointmentHour": 11}}
            ]
        }"#,
    )
    .unwrap();
    let pending = request.pending_appointments().unwrap();

    assert_eq!(pending[0].features.as_ref().unwrap().appointment_hour, Some(7));
    assert_eq!(pending[1].features.as_ref().unwrap().appointment_hour, Some(11));
}

#[test]
fn early_morning_history_becomes_reclaimable() {
    let request: ScheduleRequest = serde_json::from_str(
        r#"{
            "startTime": "07:00",
            "existingAppointments": [
                {"id": "early", "startTime": "07:00", "features": {"previousNoShowRate": 0.65}}
            ]
        }"#,
    )
    .unwrap();
    let pending = request.pending_appointments().unwrap();
    let appointments = resolve_appointments(&pending, &HeuristicEstimator, 0.0).unwrap();
    let classified = classify(&appointments, 0.7).unwrap();

    // 0.65 history plus the off-hours bump for a 07:00 start.
    assert!((classified[0].risk - 0.75).abs() < 1e-9);
    assert_eq!(classified[0].occupancy, Occupancy::Reclaimable);
}

#[test]
fn inverted_request_window_is_invalid_window() {
    let request: ScheduleRequest =
        serde_json::from_str(r#"{"startTime":"17:00","endTime":"09:00"}"#).unwrap();

    assert!(matches!(
        request.window(),
        Err(SlotError::InvalidWindow { .. })
    ));
}

#[test]
fn unparseable_window_time_is_invalid_time() {
    let request: ScheduleRequest = serde_json::from_str(r#"{"startTime":"9am"}"#).unwrap();

    assert_eq!(
        request.window(),
        Err(SlotError::InvalidTime("9am".to_string()))
    );
}

#[test]
fn unparseable_appointment_time_names_the_appointment() {
    let request: ScheduleRequest = serde_json::from_str(
        r#"{"existingAppointments":[{"id":"x9","startTime":"ten"}]}"#,
    )
    .unwrap();

    match request.pending_appointments() {
        Err(SlotError::InvalidAppointment { id, .. }) => assert_eq!(id, "x9"),
        other => panic!("expected InvalidAppointment, got {other:?}"),
    }
}

#[test]
fn response_encodes_hhmm_and_keeps_order() {
    let candidates = vec![
        SlotCandidate { start: t(13, 0), end: t(13, 30), score: 0.85 },
        SlotCandidate { start: t(9, 5), end: t(9, 35), score: 0.5 },
    ];
    let response = ScheduleResponse::new("doc-7", &candidates);
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["doctorId"], "doc-7");
    assert_eq!(value["availableSlots"][0]["startTime"], "13:00");
    assert_eq!(value["availableSlots"][0]["endTime"], "13:30");
    assert_eq!(value["availableSlots"][0]["optimalityScore"], 0.85);
    assert_eq!(value["availableSlots"][1]["startTime"], "09:05");
}

#[test]
fn request_to_response_end_to_end() {
    let request: ScheduleRequest = serde_json::from_str(
        r#"{
            "doctorId": "doc-2",
            "existingAppointments": [
                {"id": "keep", "startTime": "10:00", "noShowProbability": 0.2},
                {"id": "reclaim", "startTime": "14:00", "noShowProbability": 0.85}
            ]
        }"#,
    )
    .unwrap();
    let window = request.window().unwrap();
    let appointments: Vec<ExistingAppointment> = request
        .pending_appointments()
        .unwrap()
        .into_iter()
        .map(|p| ExistingAppointment::new(p.id, p.start, p.duration_minutes, p.risk.unwrap()).unwrap())
        .collect();
    let slots = optimize_schedule(&window, &appointments, &OptimizerConfig::default()).unwrap();
    let response = ScheduleResponse::new(request.doctor_id, &slots);

    let starts: Vec<&str> = response
        .available_slots
        .iter()
        .map(|s| s.start_time.as_str())
        .collect();
    assert_eq!(starts.len(), 15);
    assert!(!starts.contains(&"10:00"));
    assert!(starts.contains(&"14:00"));
}

#[test]
fn classification_entry_serializes_occupancy_lowercase() {
    let booked = vec![ExistingAppointment::new("a1", t(10, 0), 30, 0.9).unwrap()];
    let classified = classify(&booked, 0.7).unwrap();
    let value = serde_json::to_value(ClassificationEntry::from(&classified[0])).unwrap();

    assert_eq!(value["id"], "a1");
    assert_eq!(value["endTime"], "10:30");
    assert_eq!(value["occupancy"], "reclaimable");
}
