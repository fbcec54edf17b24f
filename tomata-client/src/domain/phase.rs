use std::fmt;

use serde::{Deserialize, Serialize};

/// One interval of a pomodoro cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    /// Description line the authority sends alongside sequence info.
    pub fn description(self) -> &'static str {
        match self {
            Phase::Work => "Time to work!",
            Phase::ShortBreak => "Short break",
            Phase::LongBreak => "Long break - rest a little longer!",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Pomodoro",
            Phase::ShortBreak => "Short break",
            Phase::LongBreak => "Long break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short_break",
            Phase::LongBreak => "long_break",
        };
        f.write_str(s)
    }
}
