use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, HTTP_REQUEST_TIMEOUT_SECS,
};

/// Environment variables with this prefix override file settings
pub const ENV_PREFIX: &str = "DOCCHAT_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote document service
    #[serde(default)]
    pub server: ServerConfig,

    /// Upload form settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Remote service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root URL the chat, upload and lookup endpoints hang off
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Characters per chunk, passed through to the service
    pub chunk_size: usize,
    /// Overlap between chunks, passed through to the service
    pub chunk_overlap: usize,
    /// Where staged copies are written (OS temp dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            staging_dir: None,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Render assistant replies as Markdown
    pub render_markdown: bool,
    /// Show the document panel next to the chat
    pub show_document_panel: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            render_markdown: true,
            show_document_panel: true,
        }
    }
}

/// Build the layered configuration: defaults, then each file, then env
pub fn config_figment(files: &[PathBuf]) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Config files consulted by `load_config`, lowest priority first
pub fn config_files() -> Result<Vec<PathBuf>> {
    Ok(vec![
        get_config_dir()?.join("config.toml"),
        local_config_path(),
    ])
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    config_figment(&config_files()?)
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from one explicit file, still honoring env overrides
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    config_figment(&[path.to_path_buf()])
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Project-local config, relative to the working directory
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".docchat/config.toml")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "docchat") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("docchat");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    } else {
        println!("Configuration already exists at: {}", config_file.display());
    }

    let local_example = PathBuf::from(".docchat/config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# docchat project configuration
# Copy to .docchat/config.toml to override global settings for this directory

[server]
base_url = "http://localhost:8000"
request_timeout_secs = 120

[upload]
chunk_size = 500
chunk_overlap = 200
# staging_dir = "/tmp/docchat"

[ui]
render_markdown = true
show_document_panel = true
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
