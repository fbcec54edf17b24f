use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tomata-tui")]
#[command(about = "Terminal pomodoro timer synchronized with a tomata server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against a real tomata server
    Run,
    /// Run in dev mode with an in-memory authority
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
}
