use std::time::{Duration, Instant};

use time::OffsetDateTime;
use tomata_client::domain::{
    ActiveSession, Phase, SequenceInfo, StartedSession, TimerSettings,
};

pub mod durations;
mod state;

pub use state::{ClientView, SettingsField, SettingsForm, SyncOrigin, TimerState, View};

/// Client-side timer state. The server owns the session of record; this is
/// a read-through cache plus the anchors the local countdown is derived
/// from. Remaining time is always recomputed from the anchor, never kept as
/// a decrementing counter, so it stays correct across suspends and missed
/// ticks.
pub struct App {
    pub running: bool,
    pub timer_state: TimerState,
    pub phase: Phase,
    /// Frozen at session start; settings changes only affect the next phase.
    pub duration_secs: u64,
    pub absolute_start: Option<OffsetDateTime>, // authority's anchor, for reference
    pub local_start: Option<Instant>,           // monotonic anchor driving the countdown
    pub sync: SyncOrigin,
    /// Latch ensuring expiry raises exactly one completion event per session.
    completion_fired: bool,
    /// In-flight mutation guard: while a remote mutation is outstanding no
    /// second mutating action is accepted.
    pub busy: bool,

    pub settings: TimerSettings,
    pub sequence: SequenceInfo,

    pub status_message: Option<String>,
    pub current_view: View,
    pub settings_form: Option<SettingsForm>,
}

impl App {
    pub fn new() -> Self {
        let settings = TimerSettings::default();
        let phase = Phase::Work;
        Self {
            running: true,
            timer_state: TimerState::Idle,
            phase,
            duration_secs: durations::resolve(phase, &settings),
            absolute_start: None,
            local_start: None,
            sync: SyncOrigin::Synced,
            completion_fired: false,
            busy: false,
            settings,
            sequence: SequenceInfo::default(),
            status_message: None,
            current_view: View::Timer,
            settings_form: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Seconds left on the countdown. While idle this is the primed duration
    /// of the phase that would start next.
    pub fn time_left_secs(&self) -> u64 {
        match (self.timer_state, self.local_start) {
            (TimerState::Running, Some(anchor)) => {
                self.duration_secs.saturating_sub(anchor.elapsed().as_secs())
            }
            _ => self.duration_secs,
        }
    }

    /// True exactly once per session when the countdown reaches zero.
    /// Repeated calls while already expired stay false until a new session
    /// resets the latch.
    pub fn take_completion_event(&mut self) -> bool {
        if self.timer_state == TimerState::Running
            && !self.completion_fired
            && self.time_left_secs() == 0
        {
            self.completion_fired = true;
            true
        } else {
            false
        }
    }

    pub fn client_view(&self) -> ClientView {
        ClientView {
            time_left_secs: self.time_left_secs(),
            phase: self.phase,
            is_running: self.timer_state == TimerState::Running,
            progress_fraction: self.sequence.progress_fraction(),
            synced: self.sync == SyncOrigin::Synced,
        }
    }

    /// Stage one of starting: show the locally resolved countdown right
    /// away, before the authority has confirmed anything.
    pub fn start_optimistic(&mut self, assumed_phase: Phase) {
        self.timer_state = TimerState::Running;
        self.phase = assumed_phase;
        self.duration_secs = durations::resolve(assumed_phase, &self.settings);
        self.absolute_start = None;
        self.local_start = Some(Instant::now());
        self.sync = SyncOrigin::Optimistic;
        self.completion_fired = false;
    }

    /// Stage two: replace the optimistic state with the authoritative
    /// start and duration.
    pub fn apply_started(&mut self, started: &StartedSession) {
        self.timer_state = TimerState::Running;
        self.phase = started.phase;
        self.duration_secs = started.duration_secs;
        self.absolute_start = started.start_time;
        self.local_start = Some(Instant::now());
        self.sync = SyncOrigin::Synced;
        self.completion_fired = false;
    }

    /// Adopt a session fetched mid-flight (reconnect, reopened client).
    /// The local anchor is backdated by the elapsed time the authority
    /// reports, which sidesteps client/server clock skew.
    pub fn apply_active(&mut self, session: &ActiveSession) {
        let elapsed = Duration::from_secs(session.elapsed_secs());
        self.timer_state = TimerState::Running;
        self.phase = session.phase;
        self.duration_secs = session.duration_secs;
        self.absolute_start = session.start_time;
        self.local_start = Some(Instant::now() - elapsed);
        self.sync = SyncOrigin::Synced;
        self.completion_fired = false;
    }

    fn to_idle(&mut self, phase: Phase, sync: SyncOrigin) {
        self.timer_state = TimerState::Idle;
        self.phase = phase;
        self.duration_secs = durations::resolve(phase, &self.settings);
        self.absolute_start = None;
        self.local_start = None;
        self.sync = sync;
        self.completion_fired = false;
    }

    /// Idle on the current phase after a confirmed stop.
    pub fn stop_to_idle(&mut self) {
        self.to_idle(self.phase, SyncOrigin::Synced);
    }

    /// Idle primed with the recommended next phase (auto-start declined).
    pub fn prime_idle(&mut self, phase: Phase) {
        self.to_idle(phase, SyncOrigin::Synced);
    }

    /// Degraded fallback when a transition could not be synchronized: idle
    /// with a locally resolved duration, visibly unsynced.
    pub fn degrade_to_idle(&mut self, phase: Phase) {
        self.to_idle(phase, SyncOrigin::Optimistic);
    }

    /// Adopt a new settings snapshot. A running countdown keeps the
    /// duration it started with; an idle display is re-primed immediately.
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        if self.timer_state == TimerState::Idle {
            self.duration_secs = durations::resolve(self.phase, &self.settings);
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn open_settings(&mut self) {
        self.settings_form = Some(SettingsForm::from_settings(&self.settings));
        self.current_view = View::Settings;
    }

    pub fn close_settings(&mut self) {
        self.settings_form = None;
        self.current_view = View::Timer;
    }
}
