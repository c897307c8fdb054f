//! # slot-engine
//!
//! Risk-aware appointment slot recommendation for a single provider day.
//!
//! Given a working window and the provider's existing appointments (each with
//! an estimated no-show risk), the engine produces every open candidate slot
//! ranked by a composite desirability score. Appointments likely to be missed
//! do not block their interval, so their slots can be offered again.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveTime;
//! use slot_engine::{optimize_schedule, ExistingAppointment, OptimizerConfig, WorkingWindow};
//!
//! let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
//! let window = WorkingWindow::new(t(9, 0), t(17, 0), 30, 30).unwrap();
//! let booked = vec![ExistingAppointment::new("a1", t(10, 0), 30, 0.2).unwrap()];
//!
//! let slots = optimize_schedule(&window, &booked, &OptimizerConfig::default()).unwrap();
//! assert_eq!(slots.len(), 15);
//! assert!(slots.iter().all(|s| s.start != t(10, 0)));
//! ```
//!
//! ## Modules
//!
//! - [`occupancy`] — Classify existing appointments as blocking or reclaimable
//! - [`scorer`] — Sweep the window, reject blocked candidates, score and rank the rest
//! - [`preference`] — Time-of-day preference table
//! - [`optimizer`] — End-to-end entry points, with optional risk estimation
//! - [`estimator`] — No-show estimator trait, heuristic fallback, risk resolution
//! - [`config`] — Typed optimizer configuration with defaults and overrides
//! - [`window`] — Working-hours window
//! - [`wire`] — JSON request/response DTOs with `HH:MM` times
//! - [`clock`] — Time-of-day parsing and arithmetic
//! - [`error`] — Error types

pub mod clock;
pub mod config;
pub mod error;
pub mod estimator;
pub mod occupancy;
pub mod optimizer;
pub mod preference;
pub mod scorer;
pub mod window;
pub mod wire;

pub use config::{OptimizerConfig, ScoringFactors};
pub use error::SlotError;
pub use estimator::{resolve_risk, AppointmentFeatures, HeuristicEstimator, NoShowEstimator};
pub use occupancy::{classify, ClassifiedAppointment, ExistingAppointment, Occupancy};
pub use optimizer::{
    optimize_schedule, optimize_with_estimator, resolve_appointments, PendingAppointment,
};
pub use preference::{PreferenceBand, TimePreferenceTable};
pub use scorer::{generate_slots, SlotCandidate};
pub use window::WorkingWindow;
pub use wire::{ScheduleRequest, ScheduleResponse, SlotEntry};
