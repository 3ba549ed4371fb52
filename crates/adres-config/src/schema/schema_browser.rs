//! Browser launch and wait-bound configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Chrome launch options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Explicit Chrome executable. Well-known install paths are searched when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Appended after the built-in unattended-mode flags.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Major version the portal flow was verified against. A mismatch is logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_major_version: Option<u32>,

    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: default_headless(),
            extra_args: Vec::new(),
            expected_major_version: None,
            launch_timeout_ms: default_launch_timeout_ms(),
        }
    }
}

impl BrowserConfig {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }
}

fn default_headless() -> bool {
    true
}

fn default_launch_timeout_ms() -> u64 {
    15_000
}

/// Bounded waits and input pacing.
///
/// All bounds are upper limits: a wait that is not satisfied in time fails
/// instead of blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Entry page: document load, iframe presence and control interactability.
    #[serde(default = "default_page_wait_secs")]
    pub page_wait_secs: u64,

    /// Result window appearance after submission.
    #[serde(default = "default_popup_wait_secs")]
    pub popup_wait_secs: u64,

    /// Result window body presence.
    #[serde(default = "default_body_wait_secs")]
    pub body_wait_secs: u64,

    /// Result table presence.
    #[serde(default = "default_table_wait_secs")]
    pub table_wait_secs: u64,

    /// Pause between identity digits.
    #[serde(default = "default_keystroke_delay_ms")]
    pub keystroke_delay_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Single DevTools command round trip.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_wait_secs: default_page_wait_secs(),
            popup_wait_secs: default_popup_wait_secs(),
            body_wait_secs: default_body_wait_secs(),
            table_wait_secs: default_table_wait_secs(),
            keystroke_delay_ms: default_keystroke_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl TimingConfig {
    pub fn page_wait(&self) -> Duration {
        Duration::from_secs(self.page_wait_secs)
    }

    pub fn popup_wait(&self) -> Duration {
        Duration::from_secs(self.popup_wait_secs)
    }

    pub fn body_wait(&self) -> Duration {
        Duration::from_secs(self.body_wait_secs)
    }

    pub fn table_wait(&self) -> Duration {
        Duration::from_secs(self.table_wait_secs)
    }

    pub fn keystroke_delay(&self) -> Duration {
        Duration::from_millis(self.keystroke_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// The shortest of the wait bounds.
    pub fn shortest_wait(&self) -> Duration {
        [
            self.page_wait(),
            self.popup_wait(),
            self.body_wait(),
            self.table_wait(),
        ]
        .into_iter()
        .min()
        .unwrap_or_default()
    }
}

fn default_page_wait_secs() -> u64 {
    20
}

fn default_popup_wait_secs() -> u64 {
    60
}

fn default_body_wait_secs() -> u64 {
    10
}

fn default_table_wait_secs() -> u64 {
    20
}

fn default_keystroke_delay_ms() -> u64 {
    50
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_command_timeout_secs() -> u64 {
    30
}
