//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_browser;

pub use schema_browser::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target portal: where the form lives and how its controls are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_portal_url")]
    pub url: String,

    /// Text the result window shows when the identity has no registry record.
    #[serde(default = "default_not_found_phrase")]
    pub not_found_phrase: String,

    /// Option value selected in the document-type control.
    #[serde(default = "default_document_type")]
    pub document_type: String,

    #[serde(default = "default_input_id")]
    pub input_id: String,

    #[serde(default = "default_document_type_id")]
    pub document_type_id: String,

    #[serde(default = "default_submit_id")]
    pub submit_id: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: default_portal_url(),
            not_found_phrase: default_not_found_phrase(),
            document_type: default_document_type(),
            input_id: default_input_id(),
            document_type_id: default_document_type_id(),
            submit_id: default_submit_id(),
        }
    }
}

fn default_portal_url() -> String {
    "https://www.adres.gov.co/consulte-su-eps".to_string()
}

fn default_not_found_phrase() -> String {
    "no se encuentra en BDUA".to_string()
}

fn default_document_type() -> String {
    "CC".to_string()
}

fn default_input_id() -> String {
    "txtNumDoc".to_string()
}

fn default_document_type_id() -> String {
    "tipoDoc".to_string()
}

fn default_submit_id() -> String {
    "btnConsultar".to_string()
}

/// HTTP boundary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Queries admitted at once; each one owns its own browser.
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent_queries: default_max_concurrent_queries(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_concurrent_queries() -> usize {
    1
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
