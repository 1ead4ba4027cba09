use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use actionbook_cli::cli::{
    cmd_info, cmd_list, cmd_run, cmd_validate, ListArgs, RunArgs, ValidateArgs,
};
use actionbook_cli::config::{load_config, ConfigSource};

/// actionbook - data-driven browser action runner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a named action against the dry-run driver
    Run(RunArgs),

    /// Load definitions and report schema problems
    Validate(ValidateArgs),

    /// List loaded actions with kinds and step counts
    List(ListArgs),

    /// Show version and configuration overview
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The configuration decides the log directory, so it is loaded before the
    // subscriber goes up; its provenance is logged right after.
    let (config, config_source) = load_config(cli.config.as_deref()).await?;
    let _log_guard = init_logging(&cli.log_level, cli.debug, config.log_dir.as_deref())?;

    info!("Starting actionbook v{}", env!("CARGO_PKG_VERSION"));
    match &config_source {
        ConfigSource::File(path) => info!("Loaded configuration from: {}", path.display()),
        ConfigSource::MissingFile(path) => warn!(
            "Config file not found, using defaults: {}",
            path.display()
        ),
        ConfigSource::Defaults => warn!("No platform config directory, using defaults"),
    }

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args, &config).await,
        Commands::Validate(args) => cmd_validate(args, &config).await,
        Commands::List(args) => cmd_list(args, &config).await,
        Commands::Info => cmd_info(&config).await,
    };

    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str, debug: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "actionbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}
