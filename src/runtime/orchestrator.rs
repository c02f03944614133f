use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;
use tracing::warn;

use super::controller::{upload_notice, ChatController};
use super::non_interactive::NonInteractiveRunner;
use crate::{
    api::{DocumentService, HttpDocumentService},
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli, Commands},
    session::Session,
    tui::{run_ui, App},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(()); // Command handled, exit
            }
            // Continue to chat for Commands::Chat
        }

        let controller = build_controller(&self.config)?;

        if let Some(prompt) = self.cli.prompt.clone() {
            return self.run_non_interactive(controller, prompt).await;
        }

        println!(
            "📚 Starting docchat against {}",
            controller.service().endpoint_description().green()
        );

        let mut session = Session::new();
        let mut initial_notice = None;

        if let Some(path) = &self.cli.document {
            println!("📄 Uploading {}...", path.display());
            match controller.upload_into(&mut session, path).await {
                Ok(result) => {
                    let notice = upload_notice(&result);
                    println!("   {}", notice.green());
                    initial_notice = Some(result);
                }
                Err(e) => {
                    eprintln!("❌ Error uploading document: {}", e);
                    eprintln!("   Continuing without a document; use :upload <path> to retry.");
                }
            }
        }

        let mut app = App::new(controller, session, &self.config.ui);
        if let Some(result) = initial_notice {
            app.record_upload(&result);
        }

        run_ui(app).await
    }

    async fn run_non_interactive(&self, controller: ChatController, prompt: String) -> Result<()> {
        let mut runner = NonInteractiveRunner::new(controller);
        let result = runner.execute(prompt, self.cli.document.as_deref()).await;

        let formatted = runner.format_result(&result, self.cli.output_format.clone());
        println!("{}", formatted);

        // Exit with appropriate code
        if !result.errors.is_empty() {
            std::process::exit(1);
        }

        Ok(())
    }
}

/// Explicit --config file, else the layered sources; --base-url wins last
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_from(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config: {:#}. Using defaults.", e);
                eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };

    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
    }

    Ok(config)
}

/// Wire the HTTP service into a controller
pub fn build_controller(config: &Config) -> Result<ChatController> {
    let service = HttpDocumentService::from_config(&config.server)
        .context("Failed to create document service client")?;
    Ok(ChatController::new(Arc::new(service), &config.upload))
}

/// Whether this invocation will take over the terminal
pub fn is_interactive(cli: &Cli) -> bool {
    cli.prompt.is_none() && matches!(cli.command, None | Some(Commands::Chat))
}
