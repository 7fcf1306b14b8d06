//! `pitchside-tui`: terminal monitor for live SimSpark soccer matches.
//!
//! Draws a plan view of the field and drives the match server through
//! `pitchside-core`'s [`LiveInteractionController`]: bound keys restart
//! play, clicks select and move the ball or agents, and Ctrl/Shift clicks
//! push the ball along the ground or chip it.
//!
//! Logs are written to a file (default `/tmp/pitchside-tui.log`) to avoid
//! corrupting the terminal UI. A background bridge task forwards link state
//! changes and decoded game state from the monitor connection into the TUI
//! action loop.
//!
//! [`LiveInteractionController`]: pitchside_core::LiveInteractionController

mod action;
mod app;
mod bridge;
mod echo;
mod event;
mod field;
mod input;
mod overlay;
mod scene;
mod terminal;
mod theme;
mod view;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pitchside_config::Config;

use crate::app::App;

/// Terminal monitor for controlling live SimSpark soccer matches.
#[derive(Parser, Debug)]
#[command(name = "pitchside-tui", version, about)]
struct Cli {
    /// Match server host
    #[arg(long)]
    host: Option<String>,

    /// Match server monitor port
    #[arg(short, long)]
    port: Option<u16>,

    /// Wait for the connect key instead of connecting on startup
    #[arg(long)]
    no_auto_connect: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Log file path (defaults to /tmp/pitchside-tui.log)
    #[arg(long, default_value = "/tmp/pitchside-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line flags win over the config file and environment.
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_auto_connect {
            config.server.auto_connect = false;
        }
    }
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI owns
/// the terminal. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pitchside_tui={log_level},pitchside_core={log_level},pitchside_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("pitchside-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a failure during setup still leaves a usable terminal
    terminal::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let mut config = pitchside_config::load_config().unwrap_or_else(|err| {
        warn!(error = %err, "config file unusable, falling back to defaults");
        Config::default()
    });
    cli.apply(&mut config);

    if cli.save_config {
        pitchside_config::save_config(&config)?;
        println!("{}", pitchside_config::config_path().display());
        return Ok(());
    }

    let controller_config = config.to_controller_config()?;
    info!(
        endpoint = %controller_config.link.endpoint(),
        auto_connect = controller_config.link.auto_connect,
        "starting pitchside-tui"
    );

    let mut app = App::new(&controller_config)?;
    app.run().await?;

    Ok(())
}
