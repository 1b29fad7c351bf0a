//! Time Mode Resolution
//!
//! Decides whether the board shows the AM or PM schedule from the configured
//! setting, the local clock, and any manual override a controller has set.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use feedboard_types::TimeMode;

/// Configured time mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeModeSetting {
    /// Follow the local clock
    #[default]
    Auto,
    Am,
    Pm,
}

/// A temporary forced time mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOverride {
    pub mode: TimeMode,
    pub expires_at: DateTime<Utc>,
}

impl TimeOverride {
    /// Override lasting `minutes` from `now`
    pub fn for_minutes(mode: TimeMode, now: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            mode,
            expires_at: now + Duration::minutes(i64::from(minutes)),
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Setting plus the AUTO switch-over hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeModePolicy {
    pub setting: TimeModeSetting,
    pub pm_starts_at_hour: u32,
}

impl TimeModePolicy {
    /// Resolve the mode at `now`; an unexpired override always wins
    pub fn resolve<Tz: TimeZone>(&self, time_override: Option<&TimeOverride>, now: &DateTime<Tz>) -> TimeMode {
        if let Some(o) = time_override {
            if o.is_active_at(now.with_timezone(&Utc)) {
                return o.mode;
            }
        }

        match self.setting {
            TimeModeSetting::Am => TimeMode::Am,
            TimeModeSetting::Pm => TimeMode::Pm,
            TimeModeSetting::Auto if now.hour() < self.pm_starts_at_hour => TimeMode::Am,
            TimeModeSetting::Auto => TimeMode::Pm,
        }
    }
}
