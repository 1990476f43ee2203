//! `qrdesk`: terminal frontend for managing users and their QR codes.
//!
//! Built on [ratatui](https://ratatui.rs) over the synchronous
//! [`Coordinator`](qrdesk_core::Coordinator) state machine. Backend calls run
//! on spawned tokio tasks and feed their results back into the action loop.
//!
//! Logs are written to a file (default `/tmp/qrdesk.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod panel;
mod panels;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Manage users and generate QR codes against a qrdesk backend.
#[derive(Parser, Debug)]
#[command(name = "qrdesk", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:8080); overrides the profile
    #[arg(short = 'u', long, env = "QRDESK_URL")]
    url: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "QRDESK_PROFILE")]
    profile: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/qrdesk.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be written to stdout or stderr while the
/// TUI is up. The returned guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "qrdesk={log_level},qrdesk_core={log_level},qrdesk_api={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("qrdesk.log"));

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

    // Hooks go in before the terminal is touched.
    tui::install_hooks(&cli.log_file)?;

    let _log_guard = setup_tracing(&cli);

    // Priority: --url > --profile / default profile > built-in default
    let config = qrdesk_config::load_config()?;
    let backend_config =
        qrdesk_config::resolve_backend(&config, cli.profile.as_deref(), cli.url.as_deref())?;
    info!(
        url = %backend_config.url,
        profile = cli.profile.as_deref().unwrap_or("(default)"),
        "starting qrdesk"
    );

    let backend = qrdesk_core::connect(&backend_config)?;
    let mut app = App::new(backend);
    app.run().await?;

    Ok(())
}
