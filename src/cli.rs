//! CLI definitions and the one-shot commands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use adres_config::{Config, ConfigValidator};
use adres_scraper::{AdresScraper, Outcome, QueryRequest};

use crate::server::{is_valid_identity, outcome_body, INVALID_IDENTITY};

/// ADRES affiliation lookup.
#[derive(Parser)]
#[command(name = "adres")]
#[command(about = "Query health-system affiliation on the ADRES BDUA portal")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Look up one identity and print the result as JSON
    Consult {
        /// Identity document number (digits only)
        identity: String,
    },

    /// Serve the HTTP API
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,

        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate the configuration
    CheckConfig,
}

/// Exit codes for `consult`.
const EXIT_FOUND: u8 = 0;
const EXIT_NOT_FOUND: u8 = 1;
const EXIT_FAILED: u8 = 2;

pub(crate) async fn run_consult(config: &Config, identity: &str) -> ExitCode {
    if !is_valid_identity(identity) {
        error!("{}", INVALID_IDENTITY);
        println!("{}", serde_json::json!({ "detail": INVALID_IDENTITY }));
        return ExitCode::from(EXIT_FAILED);
    }

    let scraper = AdresScraper::from_config(config);
    let outcome = scraper.consult(&QueryRequest::new(identity)).await;

    let (_, body) = outcome_body(&outcome);
    match serde_json::to_string_pretty(&body) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Could not render result: {}", e),
    }

    ExitCode::from(match outcome {
        Outcome::Found(_) => EXIT_FOUND,
        Outcome::NotFound => EXIT_NOT_FOUND,
        Outcome::Failed(_) => EXIT_FAILED,
    })
}

pub(crate) fn run_check_config(config: &Config) -> ExitCode {
    let result = ConfigValidator::validate(config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for err in &result.errors {
        println!("error: {}: {}", err.path, err.message);
    }

    if result.is_valid() {
        println!("Configuration OK");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_consult() {
        let cli = Cli::try_parse_from(["adres", "consult", "1234567"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert!(matches!(cli.command, Commands::Consult { identity } if identity == "1234567"));
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "adres", "serve", "--port", "9000", "--config", "/etc/adres.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/adres.toml"));
        assert!(matches!(
            cli.command,
            Commands::Serve { host: None, port: Some(9000) }
        ));
    }

    #[test]
    fn test_parse_requires_command() {
        assert!(Cli::try_parse_from(["adres"]).is_err());
    }

    #[test]
    fn test_check_config_default_is_valid() {
        assert_eq!(run_check_config(&Config::default()), ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_consult_rejects_non_digits_without_browser() {
        let code = run_consult(&Config::default(), "12a4").await;
        assert_eq!(code, ExitCode::from(EXIT_FAILED));
    }
}
