use anyhow::Result;
use tomata_client::domain::Phase;
use tomata_client::{TomataClient, TomataError};
use tracing::{info, warn};

use crate::app::{App, TimerState};

use super::action_queue::Action;

pub(super) async fn run_action(action: Action, app: &mut App, client: &TomataClient) -> Result<()> {
    match action {
        Action::ToggleStartStop => handle_toggle(app, client).await,
        Action::SwitchPhase(phase) => handle_switch_phase(phase, app, client).await,
        Action::CompleteAndAdvance => handle_complete(app, client).await,
        Action::RefreshSequence => {
            refresh_sequence(app, client).await;
            Ok(())
        }
        Action::ResetSequence => handle_reset(app, client).await,
        Action::SettingsChanged(settings) => handle_settings_changed(settings, app, client).await,
        Action::ReloadFromServer => {
            reload_from_server(app, client).await;
            Ok(())
        }
    }
}

async fn handle_toggle(app: &mut App, client: &TomataClient) -> Result<()> {
    if app.busy {
        return Ok(());
    }
    app.busy = true;

    match app.timer_state {
        // Omitting the phase lets the authority continue the sequence.
        TimerState::Idle => start_session(None, app, client).await,
        TimerState::Running => stop_session(app, client).await,
    }

    // Every mutation is followed by a sequence re-fetch so progress is
    // never stale after a transition.
    refresh_sequence(app, client).await;
    app.busy = false;
    Ok(())
}

async fn handle_switch_phase(phase: Phase, app: &mut App, client: &TomataClient) -> Result<()> {
    if app.busy {
        return Ok(());
    }
    app.busy = true;

    // Sequenced, not concurrent: the authority must never observe two
    // active sessions for the same user.
    if app.timer_state == TimerState::Running {
        if let Err(e) = client.stop_session().await {
            warn!(error = %e, "could not stop session before switching");
        }
    }
    start_session(Some(phase), app, client).await;

    refresh_sequence(app, client).await;
    app.busy = false;
    Ok(())
}

/// Two-stage start: optimistic local countdown first, authoritative anchor
/// once the server answers. A failed call leaves the optimistic countdown
/// running rather than crashing or freezing the view.
async fn start_session(phase: Option<Phase>, app: &mut App, client: &TomataClient) {
    let assumed = phase.unwrap_or(app.sequence.next_phase);
    app.start_optimistic(assumed);

    match client.start_session(phase).await {
        Ok(started) => {
            info!(phase = %started.phase, duration = started.duration_secs, "session started");
            app.apply_started(&started);
            app.clear_status();
        }
        Err(TomataError::Conflict) => {
            // The authority already has a session for us; it wins.
            warn!("start conflicted with an existing session, re-syncing");
            reload_from_server(app, client).await;
            app.set_status("Recovered the session already running on the server".to_string());
        }
        Err(e) => {
            warn!(error = %e, "start failed, continuing optimistically");
            app.set_status(format!("Offline: {} (counting down locally)", e));
        }
    }
}

async fn stop_session(app: &mut App, client: &TomataClient) {
    match client.stop_session().await {
        Ok(()) => {
            info!(phase = %app.phase, "session stopped");
            app.stop_to_idle();
            app.clear_status();
        }
        Err(e) => {
            // The view must not stay stuck on a countdown the user ended.
            warn!(error = %e, "could not stop server session");
            let phase = app.phase;
            app.degrade_to_idle(phase);
            app.set_status(format!("Warning: could not stop server session: {}", e));
        }
    }
}

async fn handle_complete(app: &mut App, client: &TomataClient) -> Result<()> {
    if app.busy {
        return Ok(());
    }
    app.busy = true;

    let finished_phase = app.phase;
    if let Err(e) = advance_after_completion(app, client).await {
        warn!(error = %e, "completion flow failed, falling back to idle");
        app.degrade_to_idle(finished_phase);
        app.set_status(format!("Sync failed: {} (space to restart)", e));
    }

    app.busy = false;
    Ok(())
}

/// Strictly ordered: complete, re-fetch sequence info, then start the
/// recommendation. Starting before completing would let the authority count
/// the sequence against the wrong session.
async fn advance_after_completion(
    app: &mut App,
    client: &TomataClient,
) -> Result<(), TomataError> {
    let completed = client.complete_session().await?;
    info!(
        phase = %app.phase,
        pomodoro_count = completed.pomodoro_count,
        next = %completed.next_phase,
        "session completed"
    );

    let sequence = client.sequence_info().await?;
    let next = sequence.next_phase;
    app.sequence = sequence;

    if app.settings.auto_start_allows(next) {
        let started = client.start_session(Some(next)).await?;
        app.apply_started(&started);
        app.set_status(next.description().to_string());
    } else {
        app.prime_idle(next);
        app.set_status(format!("{} — press space to start", next.label()));
    }
    Ok(())
}

async fn handle_reset(app: &mut App, client: &TomataClient) -> Result<()> {
    if app.busy {
        return Ok(());
    }
    app.busy = true;

    match client.reset_sequence().await {
        Ok(count) => {
            info!(count, "pomodoro counter reset");
            app.set_status("Pomodoro counter reset".to_string());
            refresh_sequence(app, client).await;
        }
        Err(e) => {
            app.set_status(format!("Error resetting counter: {}", e));
        }
    }

    app.busy = false;
    Ok(())
}

async fn handle_settings_changed(
    settings: tomata_client::domain::TimerSettings,
    app: &mut App,
    client: &TomataClient,
) -> Result<()> {
    // Out-of-bounds values never leave the client and are never applied.
    if let Err(e) = settings.validate() {
        app.set_status(format!("Invalid settings: {}", e));
        return Ok(());
    }

    app.apply_settings(settings.clone());
    match client.update_settings(&settings).await {
        Ok(()) => app.set_status("Settings saved".to_string()),
        Err(e) => {
            warn!(error = %e, "could not push settings to server");
            app.set_status(format!("Warning: could not save settings to server: {}", e));
        }
    }
    Ok(())
}

/// Discard whatever we assumed locally and adopt the authoritative state.
pub(super) async fn reload_from_server(app: &mut App, client: &TomataClient) {
    match client.active_session().await {
        Ok(Some(session)) => app.apply_active(&session),
        Ok(None) => {
            if app.timer_state == TimerState::Running {
                app.stop_to_idle();
            }
        }
        Err(e) => {
            warn!(error = %e, "could not reload session from server");
            app.set_status(format!("Warning: could not reach server: {}", e));
        }
    }
    refresh_sequence(app, client).await;
}

async fn refresh_sequence(app: &mut App, client: &TomataClient) {
    match client.sequence_info().await {
        Ok(info) => app.sequence = info,
        Err(e) => warn!(error = %e, "could not refresh sequence info"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SyncOrigin;
    use std::time::{Duration, Instant};
    use tomata_client::domain::TimerSettings;

    fn dev_pair() -> (App, TomataClient) {
        (App::new(), TomataClient::dev())
    }

    #[tokio::test]
    async fn cold_start_begins_work_chosen_by_authority() {
        let (mut app, client) = dev_pair();

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.timer_state, TimerState::Running);
        assert_eq!(app.phase, Phase::Work);
        assert_eq!(app.duration_secs, 1500);
        assert_eq!(app.sync, SyncOrigin::Synced);
    }

    #[tokio::test]
    async fn toggle_stops_a_running_session() {
        let (mut app, client) = dev_pair();
        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.timer_state, TimerState::Idle);
        assert!(client.dev_handle().unwrap().active_session().is_none());
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_quiet_no_op() {
        let (mut app, client) = dev_pair();
        let before_phase = app.phase;
        let before_duration = app.duration_secs;

        // Force the running branch with nothing on the server: the stop is
        // acknowledged and nothing breaks.
        app.timer_state = TimerState::Running;
        app.local_start = Some(Instant::now());
        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.timer_state, TimerState::Idle);
        assert_eq!(app.phase, before_phase);
        assert_eq!(app.duration_secs, before_duration);
        assert_eq!(app.sync, SyncOrigin::Synced);
    }

    #[tokio::test]
    async fn natural_completion_advances_to_short_break() {
        let (mut app, client) = dev_pair();
        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        run_action(Action::CompleteAndAdvance, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.timer_state, TimerState::Running);
        assert_eq!(app.phase, Phase::ShortBreak);
        assert_eq!(app.duration_secs, 300);
        assert_eq!(app.sequence.completed_work_count, 1);
        assert_eq!(app.sequence.next_phase, Phase::Work);
    }

    #[tokio::test]
    async fn fourth_completion_earns_a_long_break() {
        let (mut app, client) = dev_pair();

        for round in 1..=4u32 {
            run_action(Action::SwitchPhase(Phase::Work), &mut app, &client)
                .await
                .unwrap();
            run_action(Action::CompleteAndAdvance, &mut app, &client)
                .await
                .unwrap();

            let expected = if round == 4 {
                Phase::LongBreak
            } else {
                Phase::ShortBreak
            };
            assert_eq!(app.phase, expected, "after {round} work completions");
        }
        assert_eq!(app.duration_secs, 900);
    }

    #[tokio::test]
    async fn switch_phase_replaces_the_server_session() {
        let (mut app, client) = dev_pair();
        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        run_action(Action::SwitchPhase(Phase::LongBreak), &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.phase, Phase::LongBreak);
        assert_eq!(app.duration_secs, 900);
        let server_session = client.dev_handle().unwrap().active_session().unwrap();
        assert_eq!(server_session.phase, Phase::LongBreak);
    }

    #[tokio::test]
    async fn completion_lands_idle_when_auto_start_declined() {
        let (mut app, client) = dev_pair();
        app.apply_settings(TimerSettings {
            auto_start_breaks: false,
            ..TimerSettings::default()
        });

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();
        run_action(Action::CompleteAndAdvance, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.timer_state, TimerState::Idle);
        assert_eq!(app.phase, Phase::ShortBreak);
        assert_eq!(app.duration_secs, 300);
        assert!(client.dev_handle().unwrap().active_session().is_none());
    }

    #[tokio::test]
    async fn reset_clears_the_counter() {
        let (mut app, client) = dev_pair();
        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();
        run_action(Action::CompleteAndAdvance, &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.sequence.completed_work_count, 1);

        run_action(Action::ResetSequence, &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.sequence.completed_work_count, 0);
    }

    #[tokio::test]
    async fn settings_change_only_affects_next_phase() {
        let (mut app, client) = dev_pair();
        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.duration_secs, 1500);

        let settings = TimerSettings {
            work_minutes: 50,
            ..TimerSettings::default()
        };
        run_action(Action::SettingsChanged(settings), &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.duration_secs, 1500, "running phase stays frozen");

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();
        run_action(Action::SwitchPhase(Phase::Work), &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.duration_secs, 3000);
    }

    #[tokio::test]
    async fn invalid_settings_are_rejected_without_partial_apply() {
        let (mut app, client) = dev_pair();
        let bad = TimerSettings {
            work_minutes: 500,
            ..TimerSettings::default()
        };

        run_action(Action::SettingsChanged(bad), &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.settings.work_minutes, 25);
        assert_eq!(client.dev_handle().unwrap().settings().work_minutes, 25);
        assert!(app.status_message.as_deref().unwrap().contains("Invalid"));
    }

    #[tokio::test]
    async fn sequence_refresh_picks_up_remote_progress() {
        let (mut app, client) = dev_pair();
        assert_eq!(app.sequence.completed_work_count, 0);

        // Another client advances the counter behind our back.
        let dev = client.dev_handle().unwrap();
        dev.start_session(Some(Phase::Work)).unwrap();
        dev.complete_session().unwrap();

        run_action(Action::RefreshSequence, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.sequence.completed_work_count, 1);
        assert_eq!(app.sequence.next_phase, Phase::ShortBreak);
    }

    #[tokio::test]
    async fn busy_guard_drops_overlapping_mutations() {
        let (mut app, client) = dev_pair();
        app.busy = true;

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();
        assert_eq!(app.timer_state, TimerState::Idle);
        assert!(client.dev_handle().unwrap().active_session().is_none());
    }

    #[tokio::test]
    async fn start_conflict_recovers_the_server_session() {
        let (mut app, client) = dev_pair();
        let dev = client.dev_handle().unwrap();
        dev.start_session(Some(Phase::LongBreak)).unwrap();
        dev.backdate_active(120);

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        // Optimistic state was discarded in favor of the authority's.
        assert_eq!(app.phase, Phase::LongBreak);
        assert_eq!(app.sync, SyncOrigin::Synced);
        let left = app.time_left_secs();
        assert!((778..=780).contains(&left), "time_left = {left}");
    }

    #[tokio::test]
    async fn unreachable_server_degrades_to_local_countdown() {
        // Nothing listens on this port; connections fail immediately.
        let client = TomataClient::new("http://127.0.0.1:9");
        let mut app = App::new();

        run_action(Action::ToggleStartStop, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.timer_state, TimerState::Running);
        assert_eq!(app.sync, SyncOrigin::Optimistic);
        assert_eq!(app.duration_secs, 1500);
        assert!(app.status_message.as_deref().unwrap().contains("Offline"));
    }

    #[tokio::test]
    async fn failed_completion_falls_back_to_idle_with_local_duration() {
        let client = TomataClient::new("http://127.0.0.1:9");
        let mut app = App::new();
        app.timer_state = TimerState::Running;
        app.phase = Phase::Work;
        app.duration_secs = 1500;
        app.local_start = Some(Instant::now() - Duration::from_secs(1500));

        run_action(Action::CompleteAndAdvance, &mut app, &client)
            .await
            .unwrap();

        assert_eq!(app.timer_state, TimerState::Idle);
        assert_eq!(app.phase, Phase::Work);
        assert_eq!(app.duration_secs, 1500);
        assert_eq!(app.sync, SyncOrigin::Optimistic);
    }
}
