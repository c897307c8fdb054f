//! Optimizer configuration.
//!
//! Every tunable constant of the engine lives here with a typed default. A
//! JSON config file only needs the keys it wants to change:
//!
//! ```json
//! { "reclaimThreshold": 0.8, "factors": { "localRisk": false } }
//! ```

use crate::error::{Result, SlotError};
use crate::estimator::DEFAULT_FALLBACK_RISK;
use crate::preference::TimePreferenceTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_RECLAIM_THRESHOLD: f64 = 0.7;
pub const DEFAULT_LOOK_AROUND_MINUTES: i64 = 60;
pub const DEFAULT_ADJACENCY_CLOSE_MINUTES: i64 = 30;
pub const DEFAULT_ADJACENT_PENALTY: f64 = 0.7;
pub const DEFAULT_NEAR_PENALTY: f64 = 0.85;

pub const ENV_RECLAIM_THRESHOLD: &str = "SLOT_ENGINE_RECLAIM_THRESHOLD";
pub const ENV_LOOK_AROUND_MINUTES: &str = "SLOT_ENGINE_LOOK_AROUND_MINUTES";
pub const ENV_ADJACENCY_CLOSE_MINUTES: &str = "SLOT_ENGINE_ADJACENCY_CLOSE_MINUTES";
pub const ENV_FALLBACK_RISK: &str = "SLOT_ENGINE_FALLBACK_RISK";

/// Which score factors take part in the product.
///
/// The combination policy is fixed: the score is the product of every enabled
/// factor. A disabled factor contributes `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringFactors {
    pub time_preference: bool,
    pub adjacency: bool,
    pub local_risk: bool,
}

impl Default for ScoringFactors {
    fn default() -> Self {
        Self {
            time_preference: true,
            adjacency: true,
            local_risk: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    /// Risk at or above which an existing appointment stops blocking its slot.
    pub reclaim_threshold: f64,
    /// Appointments starting strictly closer than this to a candidate's start
    /// count toward its local risk.
    pub look_around_minutes: i64,
    /// Gap (inclusive) under which a candidate gets the "near" penalty.
    pub adjacency_close_minutes: i64,
    /// Adjacency factor for a candidate exactly touching an appointment.
    pub adjacent_penalty: f64,
    /// Adjacency factor for a candidate within `adjacency_close_minutes`.
    pub near_penalty: f64,
    #[serde(rename = "timePreferenceTable")]
    pub time_preference: TimePreferenceTable,
    pub factors: ScoringFactors,
    /// Risk substituted when the no-show estimator cannot answer.
    pub fallback_risk: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            reclaim_threshold: DEFAULT_RECLAIM_THRESHOLD,
            look_around_minutes: DEFAULT_LOOK_AROUND_MINUTES,
            adjacency_close_minutes: DEFAULT_ADJACENCY_CLOSE_MINUTES,
            adjacent_penalty: DEFAULT_ADJACENT_PENALTY,
            near_penalty: DEFAULT_NEAR_PENALTY,
            time_preference: TimePreferenceTable::default(),
            factors: ScoringFactors::default(),
            fallback_risk: DEFAULT_FALLBACK_RISK,
        }
    }
}

impl OptimizerConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` on malformed JSON or out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SlotError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Apply `SLOT_ENGINE_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. A value that does not
    /// parse is logged and the current setting is kept.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.reclaim_threshold =
            override_value(&lookup, ENV_RECLAIM_THRESHOLD, self.reclaim_threshold);
        self.look_around_minutes =
            override_value(&lookup, ENV_LOOK_AROUND_MINUTES, self.look_around_minutes);
        self.adjacency_close_minutes = override_value(
            &lookup,
            ENV_ADJACENCY_CLOSE_MINUTES,
            self.adjacency_close_minutes,
        );
        self.fallback_risk = override_value(&lookup, ENV_FALLBACK_RISK, self.fallback_risk);
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_unit("reclaimThreshold", self.reclaim_threshold)?;
        check_unit("adjacentPenalty", self.adjacent_penalty)?;
        check_unit("nearPenalty", self.near_penalty)?;
        check_unit("fallbackRisk", self.fallback_risk)?;
        if self.look_around_minutes <= 0 {
            return Err(SlotError::InvalidConfig(format!(
                "lookAroundMinutes must be positive, got {}",
                self.look_around_minutes
            )));
        }
        if self.adjacency_close_minutes < 0 {
            return Err(SlotError::InvalidConfig(format!(
                "adjacencyCloseMinutes must not be negative, got {}",
                self.adjacency_close_minutes
            )));
        }
        self.time_preference.validate()
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SlotError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}

fn override_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, current: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has unparseable value '{}', keeping {}", key, raw, current);
            current
        }),
        None => current,
    }
}
