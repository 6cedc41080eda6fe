//! Replysmith - reply drafting for social feed posts.
//!
//! Main entry point for the replysmith CLI.

mod cli;
mod cmd_config;
mod cmd_generate;
mod cmd_state;
mod register;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use replysmith_config::{Config, ConfigLoader};

use crate::cli::{Cli, Commands, ConfigAction};
use crate::register::AppContext;

/// Initialize tracing with console output and, when enabled, daily-rotated
/// log files under the configured log directory.
///
/// Console output goes to stderr so command output on stdout stays
/// machine-readable.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let file = if config.logging.file {
        let log_dir = ConfigLoader::log_dir(config);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("replysmith")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keep the writer alive for the program duration.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(ConfigLoader::default_path);

    // Config commands must work even when the file does not load.
    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Check => Ok(exit_code(cmd_config::check(&config_path)?)),
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(ExitCode::SUCCESS)
            }
        };
    }

    let config = ConfigLoader::load_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    init_tracing(&config)?;
    debug!("Loaded configuration from {}", config_path.display());

    let ctx = AppContext::build(config)?;

    match cli.command {
        Commands::Generate(args) => Ok(exit_code(cmd_generate::run(&ctx, args).await?)),
        Commands::Status => cmd_state::status(&ctx).await.map(|_| ExitCode::SUCCESS),
        Commands::Cache { action } => cmd_state::cache(&ctx, action).await.map(|_| ExitCode::SUCCESS),
        Commands::Style { action } => cmd_state::style(&ctx, action).await.map(|_| ExitCode::SUCCESS),
        Commands::Settings { action } => {
            cmd_state::settings(&ctx, action).await.map(|_| ExitCode::SUCCESS)
        }
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}
