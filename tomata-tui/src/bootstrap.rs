use crate::app::App;
use tomata_client::TomataClient;

/// Runs before the terminal is taken over, so warnings still reach stderr.
/// Each step degrades independently: a missing server leaves the built-in
/// defaults in place and the countdown working locally.
pub async fn initialize_app_state(app: &mut App, client: &TomataClient) {
    match client.default_settings().await {
        Ok(settings) => app.apply_settings(settings),
        Err(e) => eprintln!("Warning: Could not load settings: {}", e),
    }

    match client.active_session().await {
        Ok(Some(session)) => {
            app.apply_active(&session);
            println!("Restored running session from server.");
        }
        Ok(None) => {}
        Err(e) => eprintln!("Warning: Could not check active session: {}", e),
    }

    match client.sequence_info().await {
        Ok(info) => app.sequence = info,
        Err(e) => eprintln!("Warning: Could not load sequence info: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{SyncOrigin, TimerState};
    use tomata_client::domain::Phase;

    #[tokio::test]
    async fn cold_bootstrap_leaves_idle_work() {
        let client = TomataClient::dev();
        let mut app = App::new();

        initialize_app_state(&mut app, &client).await;

        assert_eq!(app.timer_state, TimerState::Idle);
        assert_eq!(app.phase, Phase::Work);
        assert_eq!(app.duration_secs, 1500);
        assert_eq!(app.sequence.completed_work_count, 0);
    }

    #[tokio::test]
    async fn bootstrap_restores_a_running_session() {
        let client = TomataClient::dev();
        let dev = client.dev_handle().unwrap();
        dev.start_session(Some(Phase::Work)).unwrap();
        dev.backdate_active(600);

        let mut app = App::new();
        initialize_app_state(&mut app, &client).await;

        assert_eq!(app.timer_state, TimerState::Running);
        assert_eq!(app.sync, SyncOrigin::Synced);
        let left = app.time_left_secs();
        assert!((898..=900).contains(&left), "time_left = {left}");
    }

    #[tokio::test]
    async fn bootstrap_survives_an_unreachable_server() {
        let client = TomataClient::new("http://127.0.0.1:9");
        let mut app = App::new();

        initialize_app_state(&mut app, &client).await;

        assert_eq!(app.timer_state, TimerState::Idle);
        assert_eq!(app.settings.work_minutes, 25);
        assert_eq!(app.duration_secs, 1500);
    }
}
