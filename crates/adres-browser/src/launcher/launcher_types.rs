//! Launcher type definitions and configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Launcher errors.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Chrome not found. Please install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Chrome exited during startup: {0}")]
    Exited(String),

    #[error("Chrome did not publish a DevTools port within {0:?}")]
    PortTimeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Launch options.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Explicit executable; well-known paths are searched when `None`.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// Appended after the built-in flags.
    pub extra_args: Vec<String>,
    /// How long to wait for the DevTools port to be published.
    pub launch_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            extra_args: Vec::new(),
            launch_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(200),
        }
    }
}
