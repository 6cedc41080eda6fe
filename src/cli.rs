//! CLI definitions for replysmith.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Replysmith CLI.
#[derive(Parser)]
#[command(name = "replysmith")]
#[command(about = "Draft replies to social feed posts in your own voice")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.replysmith/config.toml)
    #[arg(short, long, global = true, env = "REPLYSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Draft a reply to a post and print the result as JSON
    Generate(GenerateArgs),

    /// Show the current rate-limit status
    Status,

    /// Response cache management
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Style profile management
    Style {
        #[command(subcommand)]
        action: StyleAction,
    },

    /// Stored settings management
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Post text; `-` reads it from stdin
    pub content: String,

    /// Post author's display name
    #[arg(short, long, default_value = "")]
    pub author: String,

    /// Post author's headline
    #[arg(long, default_value = "")]
    pub headline: String,

    /// Vibe label (e.g. "supportive")
    #[arg(long)]
    pub vibe: Option<String>,

    /// Extra instruction for the chosen vibe
    #[arg(long, requires = "vibe")]
    pub vibe_prompt: Option<String>,

    /// The post carries an image or video
    #[arg(long)]
    pub media: bool,

    /// Override the configured provider
    #[arg(long)]
    pub provider: Option<String>,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Show entry and response counts
    Stats,
    /// Drop every cached response
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum StyleAction {
    /// Print the stored style profile
    Show,
    /// Replace the stored profile with a JSON file
    Set {
        /// Path to a style profile JSON document
        file: PathBuf,
    },
    /// Reset to the default profile
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum SettingsAction {
    /// Print the effective settings (API key redacted)
    Show,
    /// Store settings from a JSON file; they take precedence over the config file
    Set {
        /// Path to a settings JSON document
        file: PathBuf,
    },
    /// Forget stored settings
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Validate the configuration file
    Check,
    /// Print the configuration file path in use
    Path,
}
