mod app;
mod bootstrap;
mod cli;
mod config;
mod runtime;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::TomataConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tomata_client::TomataClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TomataConfig::load()?;

    let client = match cli.command {
        Some(Commands::ConfigPath) => {
            let path = TomataConfig::config_path()?;
            if !path.exists() {
                config.save()?;
            }
            println!("{}", path.display());
            return Ok(());
        }
        Some(Commands::Dev) => {
            println!("Running against an in-memory authority (nothing is persisted).");
            TomataClient::dev()
        }
        Some(Commands::Run) | None => TomataClient::new(&config.api_url),
    };

    // Logs go to a file; the terminal belongs to the TUI.
    let _log_guard = init_tracing()?;

    let mut app = App::new();
    bootstrap::initialize_app_state(&mut app, &client).await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &client).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = TomataConfig::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "tomata-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
