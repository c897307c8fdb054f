//! Time-of-day preference table.
//!
//! Maps the start hour of a candidate slot to a preference in `[0, 1]`. The
//! table is plain data so operators can retune it from a config file.

use crate::error::{Result, SlotError};
use serde::{Deserialize, Serialize};

/// Preference returned for hours not covered by any band.
pub const DEFAULT_PREFERENCE: f64 = 0.7;

/// A half-open hour range `[start_hour, end_hour)` and its preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceBand {
    #[serde(rename = "hourRangeStart")]
    pub start_hour: u32,
    #[serde(rename = "hourRangeEnd")]
    pub end_hour: u32,
    pub preference: f64,
}

impl PreferenceBand {
    pub fn new(start_hour: u32, end_hour: u32, preference: f64) -> Self {
        Self {
            start_hour,
            end_hour,
            preference,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

/// Ordered preference bands. The first band containing an hour wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimePreferenceTable {
    pub bands: Vec<PreferenceBand>,
    pub default_preference: f64,
}

impl Default for TimePreferenceTable {
    /// Mornings and early afternoons are preferred over lunch and late
    /// afternoon.
    fn default() -> Self {
        Self {
            bands: vec![
                PreferenceBand::new(9, 11, 0.9),
                PreferenceBand::new(11, 13, 0.7),
                PreferenceBand::new(13, 15, 0.85),
                PreferenceBand::new(15, 17, 0.8),
            ],
            default_preference: DEFAULT_PREFERENCE,
        }
    }
}

impl TimePreferenceTable {
    /// Look up the preference for a start hour (0-23).
    pub fn preference_at(&self, hour: u32) -> f64 {
        self.bands
            .iter()
            .find(|band| band.contains(hour))
            .map_or(self.default_preference, |band| band.preference)
    }

    /// Reject bands with an empty or out-of-day range and preferences outside
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_preference) {
            return Err(SlotError::InvalidConfig(format!(
                "defaultPreference must be in [0, 1], got {}",
                self.default_preference
            )));
        }
        for band in &self.bands {
            if band.start_hour >= band.end_hour || band.end_hour > 24 {
                return Err(SlotError::InvalidConfig(format!(
                    "preference band [{}, {}) is not a valid hour range",
                    band.start_hour, band.end_hour
                )));
            }
            if !(0.0..=1.0).contains(&band.preference) {
                return Err(SlotError::InvalidConfig(format!(
                    "preference for band [{}, {}) must be in [0, 1], got {}",
                    band.start_hour, band.end_hour, band.preference
                )));
            }
        }
        Ok(())
    }
}
