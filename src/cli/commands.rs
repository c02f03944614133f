use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::{
    api::{DocumentLookup, HttpDocumentService},
    app::{config_files, init_config, Config, ENV_PREFIX},
    runtime::{build_controller, upload_notice},
    upload::accepted_extensions,
};

use super::Commands;

/// Handle CLI subcommands
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing docchat configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Upload { file } => {
            upload_file(file, config).await?;
            Ok(true)
        }
        Commands::Lookup { id } => {
            lookup_document(id, config).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Upload one document and report its hash code
pub async fn upload_file(path: &Path, config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    println!("📄 Uploading {}...", path.display());

    let result = controller.upload_document(path).await?;
    let notice = upload_notice(&result);
    if result.already_existed {
        println!("{}", notice.yellow());
    } else {
        println!("{}", notice.green());
    }
    Ok(())
}

/// Print the raw lookup response for a document id
pub async fn lookup_document(id: &str, config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    let details = controller.service().lookup_document(id).await?;
    println!("{}", serde_json::to_string_pretty(&details)?);
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("docchat v{}", env!("CARGO_PKG_VERSION"));
    println!("   A terminal chat client for a remote document service");
}

/// Show configuration sources and whether the service answers
async fn show_status(config: &Config) -> Result<()> {
    println!("docchat Status:");
    println!();

    // Check the document service
    let service = HttpDocumentService::from_config(&config.server)?;
    if service.is_reachable().await {
        println!("  [OK] Document service: Reachable at {}", service.base_url());
    } else {
        println!("  [ERROR] Document service: No answer from {}", service.base_url());
    }

    // Check configuration
    for path in config_files()? {
        if path.exists() {
            println!("  [OK] Configuration: {}", path.display());
        } else {
            println!("  [WARNING] Configuration: {} not found", path.display());
        }
    }

    println!("\n  Upload:");
    println!("    • Accepted types: {}", accepted_extensions());
    println!(
        "    • Chunk size / overlap: {} / {}",
        config.upload.chunk_size, config.upload.chunk_overlap
    );
    if let Some(dir) = &config.upload.staging_dir {
        println!("    • Staging directory: {}", dir.display());
    }

    // Environment variables
    let overrides: Vec<String> = std::env::vars()
        .map(|(key, _)| key)
        .filter(|key| key.starts_with(ENV_PREFIX))
        .collect();
    if !overrides.is_empty() {
        println!("\n  Environment:");
        for key in overrides {
            println!("    • {}: Set", key);
        }
    }

    println!();
    Ok(())
}
