use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(version)]
#[command(about = "Chat with your documents through a remote document service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Base URL of the document service (overrides configuration)
    #[arg(long, env = "DOCCHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Document to upload before chatting (txt, pdf, csv, md)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Non-interactive prompt to ask
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Upload a document and print its hash code
    Upload {
        /// File to upload (txt, pdf, csv, md)
        file: PathBuf,
    },
    /// Show what the service knows about a document id
    Lookup {
        /// Embedding or database id returned by an earlier upload
        id: String,
    },
    /// Start a chat session (default)
    Chat,
    /// Show version information
    Version,
    /// Check configuration and service reachability
    Status,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
