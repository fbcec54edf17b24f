use serde::Deserialize;

use super::{Phase, TimerSettings};

/// Sequence state as reported by `GET /timer/sequence-info`.
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceInfo {
    #[serde(rename = "current_pomodoro_count")]
    pub completed_work_count: u32,
    pub pomodoros_before_long_break: u32,
    #[serde(rename = "next_timer_type")]
    pub next_phase: Phase,
    #[serde(rename = "next_timer_description", default)]
    pub next_description: Option<String>,
    #[serde(rename = "sequence_progress")]
    pub progress_label: String,
    #[serde(rename = "progress_percentage")]
    pub progress_percent: u8,
}

impl SequenceInfo {
    /// Derive the full info from a counter the way the authority does, used
    /// by the dev backend and as the pre-fetch placeholder.
    pub fn derive(completed_work_count: u32, settings: &TimerSettings, next_phase: Phase) -> Self {
        let per = settings.pomodoros_before_long_break;
        let position = position_in_cycle(completed_work_count, per);
        Self {
            completed_work_count,
            pomodoros_before_long_break: per,
            next_phase,
            next_description: Some(next_phase.description().to_string()),
            progress_label: format!("{}/{}", position, per),
            progress_percent: ((position as f64 / per.max(1) as f64) * 100.0) as u8,
        }
    }

    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.progress_percent) / 100.0
    }
}

impl Default for SequenceInfo {
    fn default() -> Self {
        Self::derive(0, &TimerSettings::default(), Phase::Work)
    }
}

/// Recommend the phase that follows `last_completed`. After a work phase
/// the break is long exactly when the post-increment completed count is a
/// nonzero multiple of `pomodoros_before_long_break`; after any break (or
/// from a cold start) the next phase is work.
pub fn next_phase(
    last_completed: Option<Phase>,
    completed_work_count: u32,
    settings: &TimerSettings,
) -> Phase {
    match last_completed {
        Some(Phase::Work) => {
            let per = settings.pomodoros_before_long_break.max(1);
            if completed_work_count > 0 && completed_work_count % per == 0 {
                Phase::LongBreak
            } else {
                Phase::ShortBreak
            }
        }
        _ => Phase::Work,
    }
}

/// 1-based position within the current cycle, matching the authority's
/// "k/n" rendering: a full cycle shows n/n, a fresh counter shows 1/n.
pub fn position_in_cycle(completed_work_count: u32, pomodoros_before_long_break: u32) -> u32 {
    let per = pomodoros_before_long_break.max(1);
    let rem = completed_work_count % per;
    if rem == 0 && completed_work_count > 0 {
        per
    } else if rem == 0 {
        1
    } else {
        rem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(per: u32) -> TimerSettings {
        TimerSettings {
            pomodoros_before_long_break: per,
            ..TimerSettings::default()
        }
    }

    #[test]
    fn long_break_every_fourth_work_completion() {
        let s = settings(4);
        let expected = [
            (1, Phase::ShortBreak),
            (2, Phase::ShortBreak),
            (3, Phase::ShortBreak),
            (4, Phase::LongBreak),
            (5, Phase::ShortBreak),
            (8, Phase::LongBreak),
        ];
        for (count, phase) in expected {
            assert_eq!(
                next_phase(Some(Phase::Work), count, &s),
                phase,
                "after {count} completed work phases"
            );
        }
    }

    #[test]
    fn work_follows_any_break() {
        let s = settings(4);
        assert_eq!(next_phase(Some(Phase::ShortBreak), 3, &s), Phase::Work);
        assert_eq!(next_phase(Some(Phase::LongBreak), 4, &s), Phase::Work);
    }

    #[test]
    fn cold_start_recommends_work() {
        assert_eq!(next_phase(None, 0, &settings(4)), Phase::Work);
    }

    #[test]
    fn reset_counter_recommends_short_break_after_next_work() {
        // After a reset the count restarts at 0; the first completion is 1.
        assert_eq!(next_phase(Some(Phase::Work), 1, &settings(4)), Phase::ShortBreak);
    }

    #[test]
    fn cycle_position_matches_server_rendering() {
        assert_eq!(position_in_cycle(0, 4), 1);
        assert_eq!(position_in_cycle(1, 4), 1);
        assert_eq!(position_in_cycle(3, 4), 3);
        assert_eq!(position_in_cycle(4, 4), 4);
        assert_eq!(position_in_cycle(5, 4), 1);
    }

    #[test]
    fn derive_renders_progress_label() {
        let info = SequenceInfo::derive(2, &settings(4), Phase::ShortBreak);
        assert_eq!(info.progress_label, "2/4");
        assert_eq!(info.progress_percent, 50);
        assert!((info.progress_fraction() - 0.5).abs() < f64::EPSILON);
    }
}
