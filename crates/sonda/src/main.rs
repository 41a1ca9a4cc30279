//! Sonda - IoT telemetry ingestion and live fan-out service
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default)
//! sonda
//! sonda --config configs/config.toml
//!
//! # Explicit subcommand
//! sonda serve --config configs/config.toml
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sonda_config::{Config, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sonda - IoT telemetry ingestion and live fan-out service
#[derive(Parser, Debug)]
#[command(name = "sonda")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Global args that apply to serve when no subcommand given
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the server
    Serve(cmd::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(mut args)) => {
            // CLI global --config overrides subcommand config if both specified
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let (level, format) = resolve_logging(cli.log_level.as_deref(), args.config.as_deref());
            init_logging(&level, format)?;
            cmd::serve::run(args).await
        }
        // No subcommand = run server (default behavior)
        None => {
            let (level, format) = resolve_logging(cli.log_level.as_deref(), cli.config.as_deref());
            init_logging(&level, format)?;
            let args = cmd::serve::ServeArgs { config: cli.config };
            cmd::serve::run(args).await
        }
    }
}

/// Resolve log level and format: CLI flag > config file > defaults
fn resolve_logging(
    cli_level: Option<&str>,
    config_path: Option<&std::path::Path>,
) -> (String, LogFormat) {
    let config = config_path
        .filter(|p| p.exists())
        .and_then(|p| Config::from_file(p).ok());

    let format = config
        .as_ref()
        .map(|c| c.log.format)
        .unwrap_or(LogFormat::Console);

    // CLI flag takes precedence over the config file
    if let Some(level) = cli_level {
        return (level.to_string(), format);
    }

    let level = config
        .map(|c| c.log.level.as_str().to_string())
        .unwrap_or_else(|| "info".to_string());

    (level, format)
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
