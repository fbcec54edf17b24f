use std::sync::{Arc, Mutex};

use time::OffsetDateTime;

use crate::domain::{
    self, ActiveSession, CompletedSession, Phase, SequenceInfo, StartedSession, TimerSettings,
};
use crate::TomataError;

/// In-process stand-in for the tomata server, mirroring its session and
/// sequence semantics. Used by flow tests and `tomata-tui dev`.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevState>>,
}

#[derive(Debug)]
struct DevState {
    active: Option<DevSession>,
    pomodoro_count: u32,
    last_completed: Option<Phase>,
    settings: TimerSettings,
}

#[derive(Debug, Clone)]
struct DevSession {
    phase: Phase,
    start: OffsetDateTime,
    duration_secs: u64,
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(DevState {
                active: None,
                pomodoro_count: 0,
                last_completed: None,
                settings: TimerSettings::default(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DevState> {
        self.store.lock().expect("dev store lock poisoned")
    }

    fn duration_for(settings: &TimerSettings, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Work => settings.work_minutes,
            Phase::ShortBreak => settings.short_break_minutes,
            Phase::LongBreak => settings.long_break_minutes,
        };
        u64::from(minutes) * 60
    }

    pub fn active_session(&self) -> Option<ActiveSession> {
        let state = self.lock();
        state.active.as_ref().map(|session| {
            let elapsed = (OffsetDateTime::now_utc() - session.start)
                .whole_seconds()
                .max(0) as u64;
            ActiveSession {
                phase: session.phase,
                start_time: Some(session.start),
                duration_secs: session.duration_secs,
                time_left_secs: session.duration_secs.saturating_sub(elapsed) as f64,
            }
        })
    }

    pub fn start_session(&self, phase: Option<Phase>) -> Result<StartedSession, TomataError> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(TomataError::Conflict);
        }

        let phase = phase.unwrap_or_else(|| {
            domain::next_phase(state.last_completed, state.pomodoro_count, &state.settings)
        });
        let duration_secs = Self::duration_for(&state.settings, phase);
        let start = OffsetDateTime::now_utc();
        state.active = Some(DevSession {
            phase,
            start,
            duration_secs,
        });

        Ok(StartedSession {
            phase,
            start_time: Some(start),
            duration_secs,
        })
    }

    pub fn stop_session(&self) {
        self.lock().active = None;
    }

    pub fn complete_session(&self) -> Result<CompletedSession, TomataError> {
        let mut state = self.lock();
        let Some(session) = state.active.take() else {
            return Err(TomataError::NoActiveSession);
        };

        if session.phase == Phase::Work {
            state.pomodoro_count += 1;
        }
        state.last_completed = Some(session.phase);

        let next_phase =
            domain::next_phase(state.last_completed, state.pomodoro_count, &state.settings);
        Ok(CompletedSession {
            next_phase,
            pomodoro_count: state.pomodoro_count,
        })
    }

    pub fn sequence_info(&self) -> SequenceInfo {
        let state = self.lock();
        let next_phase =
            domain::next_phase(state.last_completed, state.pomodoro_count, &state.settings);
        SequenceInfo::derive(state.pomodoro_count, &state.settings, next_phase)
    }

    pub fn reset_sequence(&self) -> u32 {
        self.lock().pomodoro_count = 0;
        0
    }

    pub fn settings(&self) -> TimerSettings {
        self.lock().settings.clone()
    }

    pub fn update_settings(&self, settings: TimerSettings) {
        self.lock().settings = settings;
    }

    /// Test hook: shift the active session's start into the past so elapsed
    /// time can be simulated without sleeping.
    pub fn backdate_active(&self, secs: u64) {
        if let Some(session) = self.lock().active.as_mut() {
            session.start -= time::Duration::seconds(secs as i64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_second_concurrent_session() {
        let dev = DevBackend::new();
        dev.start_session(Some(Phase::Work)).unwrap();
        assert!(matches!(
            dev.start_session(Some(Phase::Work)),
            Err(TomataError::Conflict)
        ));
    }

    #[test]
    fn completing_work_advances_counter_and_recommendation() {
        let dev = DevBackend::new();

        for expected in [Phase::ShortBreak, Phase::ShortBreak, Phase::ShortBreak, Phase::LongBreak]
        {
            dev.start_session(Some(Phase::Work)).unwrap();
            let completed = dev.complete_session().unwrap();
            assert_eq!(completed.next_phase, expected);

            dev.start_session(Some(expected)).unwrap();
            let after_break = dev.complete_session().unwrap();
            assert_eq!(after_break.next_phase, Phase::Work);
        }

        assert_eq!(dev.sequence_info().completed_work_count, 4);
    }

    #[test]
    fn break_completion_does_not_advance_counter() {
        let dev = DevBackend::new();
        dev.start_session(Some(Phase::ShortBreak)).unwrap();
        let completed = dev.complete_session().unwrap();
        assert_eq!(completed.pomodoro_count, 0);
        assert_eq!(completed.next_phase, Phase::Work);
    }

    #[test]
    fn reset_clears_counter() {
        let dev = DevBackend::new();
        dev.start_session(Some(Phase::Work)).unwrap();
        dev.complete_session().unwrap();
        assert_eq!(dev.sequence_info().completed_work_count, 1);

        assert_eq!(dev.reset_sequence(), 0);
        assert_eq!(dev.sequence_info().completed_work_count, 0);
    }

    #[test]
    fn omitted_phase_continues_the_sequence() {
        let dev = DevBackend::new();
        let started = dev.start_session(None).unwrap();
        assert_eq!(started.phase, Phase::Work);
        dev.complete_session().unwrap();

        let started = dev.start_session(None).unwrap();
        assert_eq!(started.phase, Phase::ShortBreak);
    }

    #[test]
    fn session_durations_follow_settings() {
        let dev = DevBackend::new();
        dev.update_settings(TimerSettings {
            work_minutes: 50,
            ..TimerSettings::default()
        });
        let started = dev.start_session(Some(Phase::Work)).unwrap();
        assert_eq!(started.duration_secs, 3000);
    }

    #[test]
    fn backdated_session_reports_elapsed_time() {
        let dev = DevBackend::new();
        dev.start_session(Some(Phase::Work)).unwrap();
        dev.backdate_active(300);

        let session = dev.active_session().unwrap();
        let elapsed = session.elapsed_secs();
        assert!((300..=302).contains(&elapsed), "elapsed = {elapsed}");
    }
}
