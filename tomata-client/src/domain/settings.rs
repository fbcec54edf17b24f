use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Phase;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 120;

/// Timer settings as owned by the remote authority. The wire names follow
/// the server's schema; the Rust names say what the fields mean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(rename = "work_time")]
    pub work_minutes: u32,
    #[serde(rename = "break_time")]
    pub short_break_minutes: u32,
    #[serde(rename = "long_break_duration")]
    pub long_break_minutes: u32,
    #[serde(default = "default_pomodoros_before_long_break")]
    pub pomodoros_before_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default = "default_true")]
    pub auto_start_work: bool,
}

fn default_pomodoros_before_long_break() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            pomodoros_before_long_break: 4,
            auto_start_breaks: true,
            auto_start_work: true,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be between {MIN_MINUTES} and {MAX_MINUTES} minutes")]
    DurationOutOfRange { field: &'static str },
    #[error("pomodoros before long break must be at least 1")]
    InvalidSequenceLength,
}

impl TimerSettings {
    /// Reject out-of-bounds values before anything is sent to the authority.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("work duration", self.work_minutes),
            ("short break duration", self.short_break_minutes),
            ("long break duration", self.long_break_minutes),
        ] {
            if !(MIN_MINUTES..=MAX_MINUTES).contains(&value) {
                return Err(SettingsError::DurationOutOfRange { field });
            }
        }
        if self.pomodoros_before_long_break < 1 {
            return Err(SettingsError::InvalidSequenceLength);
        }
        Ok(())
    }

    /// Whether a freshly recommended phase may start without user input.
    pub fn auto_start_allows(&self, phase: Phase) -> bool {
        if phase.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_work
        }
    }
}
