use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Plain terminal output (subcommands, non-interactive runs)
    Stderr,
    /// A file, used while the terminal UI owns the screen
    File(PathBuf),
}

/// Initialize the logging system
///
/// `RUST_LOG` wins when set; otherwise `info` with verbose, `warn` without.
pub fn init_logger(verbose: bool, target: LogTarget) -> Result<()> {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .compact(),
                )
                .try_init()
                .context("Failed to install logger")?;
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false)
                        .compact(),
                )
                .try_init()
                .context("Failed to install logger")?;
        }
    }

    Ok(())
}

/// Default log file location for interactive sessions
pub fn default_log_file() -> PathBuf {
    directories::ProjectDirs::from("", "", "docchat")
        .map(|dirs| dirs.data_dir().join("docchat.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("docchat.log"))
}
