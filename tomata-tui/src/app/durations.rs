use tomata_client::domain::{Phase, TimerSettings};

pub const DEFAULT_WORK_SECS: u64 = 25 * 60;
pub const DEFAULT_SHORT_BREAK_SECS: u64 = 5 * 60;
pub const DEFAULT_LONG_BREAK_SECS: u64 = 15 * 60;

/// Map a phase to its duration in seconds under the given settings
/// snapshot. Pure: callers decide which snapshot applies — a running phase
/// keeps the duration it started with, only the next phase sees updates.
pub fn resolve(phase: Phase, settings: &TimerSettings) -> u64 {
    let minutes = match phase {
        Phase::Work => settings.work_minutes,
        Phase::ShortBreak => settings.short_break_minutes,
        Phase::LongBreak => settings.long_break_minutes,
    };
    let secs = u64::from(minutes) * 60;
    if secs == 0 {
        fallback(phase)
    } else {
        secs
    }
}

/// Fixed fallbacks for before settings have been fetched.
pub fn fallback(phase: Phase) -> u64 {
    match phase {
        Phase::Work => DEFAULT_WORK_SECS,
        Phase::ShortBreak => DEFAULT_SHORT_BREAK_SECS,
        Phase::LongBreak => DEFAULT_LONG_BREAK_SECS,
    }
}
