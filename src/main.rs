use anyhow::Result;
use clap::Parser;

use docchat::{
    cli::Cli,
    runtime::{is_interactive, Orchestrator},
    utils::{default_log_file, init_logger, LogTarget},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file
    let target = if is_interactive(&cli) {
        LogTarget::File(default_log_file())
    } else {
        LogTarget::Stderr
    };
    if let Err(e) = init_logger(cli.verbose, target) {
        eprintln!("⚠️  Logging disabled: {:#}", e);
    }

    let orchestrator = Orchestrator::new(cli)?;
    orchestrator.run().await
}
