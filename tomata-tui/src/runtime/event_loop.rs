use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tomata_client::TomataClient;

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::handle_view_key;

/// One tick per iteration: redraw with freshly recomputed remaining time,
/// raise the completion event if the countdown just expired, then drain
/// queued actions. The countdown itself never depends on the tick rate.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Background polling: another client may advance the sequence while this
/// one only watches.
const SEQUENCE_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &TomataClient,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let mut last_sequence_refresh = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.take_completion_event() {
            let _ = action_tx.send(Action::CompleteAndAdvance);
        }

        if last_sequence_refresh.elapsed() >= SEQUENCE_REFRESH_INTERVAL {
            let _ = action_tx.send(Action::RefreshSequence);
            last_sequence_refresh = Instant::now();
        }

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                handle_view_key(key, app, &action_tx);
            }
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, client).await?;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
