//! ADRES - health-system affiliation lookup
//!
//! Main entry point for the `adres` CLI and HTTP server.

mod cli;
mod server;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use adres_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console output and, when a log directory is
/// configured, a daily-rolling file.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let file_layer = match &logging.directory {
        Some(dir) => {
            let log_dir = PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy()));
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("adres")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keeps the background writer alive for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Refuse to run with an invalid configuration; log the warnings.
fn check_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(config).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Consult { identity } => {
            check_config(&config)?;
            info!("Consulting identity ({} digits)", identity.len());
            Ok(cli::run_consult(&config, &identity).await)
        }
        Commands::Serve { host, port } => {
            check_config(&config)?;
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            server::run_server(&config, &server).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckConfig => Ok(cli::run_check_config(&config)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
