use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

mod app;
mod backend;
mod config;
mod handler;
mod input;
mod markdown;
mod theme;
mod transcript;
mod tui;
mod ui;
mod youtube;

use app::App;
use config::Config;

/// Log to a file next to the config; the terminal itself belongs to the TUI.
/// When no log file can be opened the app simply runs without one. The
/// returned guard flushes buffered log lines when main exits.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("tubechat"))
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp/tubechat"));
    let file_appender = open_log_file(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubechat=info")),
        )
        .with_ansi(false)
        .with_target(false)
        .init();

    Some(guard)
}

// The builder reports a blocked directory as an error where the rolling
// shorthand would panic
fn open_log_file(log_dir: &std::path::Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("tubechat.log")
        .build(log_dir)
        .ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging();
    tracing::info!("tubechat v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        }

        app.poll_tasks().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        assert!(open_log_file(&log_dir).is_some());
        assert!(log_dir.join("tubechat.log").exists());
    }

    #[test]
    fn test_blocked_log_dir_skips_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        // The log directory path runs through a regular file
        assert!(open_log_file(&blocker.join("logs")).is_none());
    }
}
