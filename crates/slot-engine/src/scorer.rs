//! Candidate slot generation and scoring.
//!
//! Sweeps the working window at a fixed step, drops candidates that overlap a
//! blocking appointment, and scores the rest as the product of the enabled
//! factors:
//!
//! - **time preference** -- looked up from the start hour in the preference table
//! - **adjacency** -- penalty for sitting right next to another appointment
//! - **local risk** -- `1 - sum(risk) / (count + 1)` over appointments starting
//!   within the look-around window
//!
//! Output is sorted by score descending, then start ascending, so the same
//! inputs always produce the same list.

use crate::clock;
use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::occupancy::ClassifiedAppointment;
use crate::window::WorkingWindow;
use chrono::{Duration, NaiveTime, Timelike};
use std::cmp::Ordering;
use tracing::debug;

/// A scored, not-yet-booked slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCandidate {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Composite desirability in `[0, 1]`; higher is better.
    pub score: f64,
}

/// Generate and rank every open candidate slot in `window`.
///
/// A candidate `[start, start + duration)` is rejected only if it overlaps a
/// `Blocking` appointment. Touching an appointment's boundary is not overlap,
/// and `Reclaimable` appointments never reject a candidate; both still affect
/// the score.
///
/// # Errors
/// Returns `SlotError::InvalidConfig` if `config` fails validation, or
/// `SlotError::InvalidWindow` if the window is malformed.
pub fn generate_slots(
    window: &WorkingWindow,
    classified: &[ClassifiedAppointment<'_>],
    config: &OptimizerConfig,
) -> Result<Vec<SlotCandidate>> {
    config.validate()?;
    window.validate()?;

    let mut candidates = Vec::new();
    let mut rejected = 0usize;
    let mut current = window.start;

    loop {
        let Some(slot_end) = clock::add_minutes(current, window.slot_duration_minutes) else {
            break;
        };
        if slot_end > window.end {
            break;
        }

        let blocked = classified
            .iter()
            .any(|c| c.is_blocking() && c.overlaps(current, slot_end));

        if blocked {
            rejected += 1;
        } else {
            candidates.push(SlotCandidate {
                start: current,
                end: slot_end,
                score: score_candidate(current, slot_end, classified, config),
            });
        }

        match clock::add_minutes(current, window.step_minutes) {
            Some(next) => current = next,
            None => break,
        }
    }

    rank(&mut candidates);

    debug!(
        emitted = candidates.len(),
        rejected,
        appointments = classified.len(),
        "slot sweep complete"
    );

    Ok(candidates)
}

/// Sort candidates by score descending, breaking ties by earliest start.
pub fn rank(candidates: &mut [SlotCandidate]) {
    candidates.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.start.cmp(&b.start),
        other => other,
    });
}

/// Score one candidate as the product of the enabled factors.
pub fn score_candidate(
    start: NaiveTime,
    end: NaiveTime,
    classified: &[ClassifiedAppointment<'_>],
    config: &OptimizerConfig,
) -> f64 {
    let mut score = 1.0;
    if config.factors.time_preference {
        score *= time_preference_factor(start, config);
    }
    if config.factors.adjacency {
        score *= adjacency_factor(start, end, classified, config);
    }
    if config.factors.local_risk {
        score *= local_risk_factor(start, classified, config.look_around_minutes);
    }
    score
}

/// Preference for the candidate's start hour.
pub fn time_preference_factor(start: NaiveTime, config: &OptimizerConfig) -> f64 {
    config.time_preference.preference_at(start.hour())
}

/// Lowest adjacency factor across all appointments, whatever their occupancy.
///
/// The gap to an appointment is `min(|start - appt.end|, |end - appt.start|)`,
/// without rounding to whole minutes. A gap of zero gives `adjacent_penalty`, a gap up to
/// `adjacency_close_minutes` gives `near_penalty`, anything else `1.0`.
pub fn adjacency_factor(
    start: NaiveTime,
    end: NaiveTime,
    classified: &[ClassifiedAppointment<'_>],
    config: &OptimizerConfig,
) -> f64 {
    classified
        .iter()
        .map(|c| {
            let gap = clock::gap(c.appointment.end, start)
                .min(clock::gap(c.appointment.start, end));
            if gap.is_zero() {
                config.adjacent_penalty
            } else if within(gap, config.adjacency_close_minutes) {
                config.near_penalty
            } else {
                1.0
            }
        })
        .fold(1.0, f64::min)
}

/// `gap <= minutes`; minute counts too large for a `Duration` cover any gap.
fn within(gap: Duration, minutes: i64) -> bool {
    Duration::try_minutes(minutes).map_or(true, |limit| gap <= limit)
}

/// One minus the smoothed average risk of appointments starting strictly
/// within `look_around_minutes` of `start`.
///
/// The `+ 1` in the denominator keeps the factor below `1.0` whenever a risky
/// neighbour exists, and well-defined when there are none.
pub fn local_risk_factor(
    start: NaiveTime,
    classified: &[ClassifiedAppointment<'_>],
    look_around_minutes: i64,
) -> f64 {
    let limit = Duration::try_minutes(look_around_minutes);
    let (sum, count) = classified
        .iter()
        .filter(|c| limit.map_or(true, |limit| clock::gap(start, c.appointment.start) < limit))
        .fold((0.0, 0usize), |(sum, count), c| (sum + c.risk, count + 1));
    1.0 - sum / (count as f64 + 1.0)
}
