use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tomata_client::domain::Phase;

use super::action_queue::{Action, ActionTx};

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match app.current_view {
        View::Timer => handle_timer_key(key, app, action_tx),
        View::Settings => handle_settings_key(key, app, action_tx),
        View::ConfirmReset => handle_confirm_reset_key(key, app, action_tx),
    }
}

fn handle_timer_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if !app.busy {
                enqueue_action(action_tx, Action::ToggleStartStop);
            }
        }
        KeyCode::Char('1') => switch_phase(Phase::Work, app, action_tx),
        KeyCode::Char('2') => switch_phase(Phase::ShortBreak, app, action_tx),
        KeyCode::Char('3') => switch_phase(Phase::LongBreak, app, action_tx),
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Char('r') => app.current_view = View::ConfirmReset,
        KeyCode::Char('g') => enqueue_action(action_tx, Action::ReloadFromServer),
        _ => {}
    }
}

fn switch_phase(phase: Phase, app: &mut App, action_tx: &ActionTx) {
    if !app.busy {
        enqueue_action(action_tx, Action::SwitchPhase(phase));
    }
}

fn handle_settings_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(form) = app.settings_form.as_mut() else {
        app.current_view = View::Timer;
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Enter => match form.parse(&app.settings) {
            Ok(settings) => {
                app.close_settings();
                enqueue_action(action_tx, Action::SettingsChanged(settings));
            }
            Err(message) => form.error = Some(message),
        },
        KeyCode::Esc => {
            app.close_settings();
            app.set_status("Settings unchanged".to_string());
        }
        _ => {}
    }
}

fn handle_confirm_reset_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.current_view = View::Timer;
            enqueue_action(action_tx, Action::ResetSequence);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.current_view = View::Timer;
            app.set_status("Reset cancelled".to_string());
        }
        _ => {}
    }
}
