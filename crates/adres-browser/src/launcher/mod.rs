//! Chrome process launcher.
//!
//! Starts one Chrome per session with a throwaway profile and an ephemeral
//! DevTools port, configured for unattended operation.

mod launcher_core;
mod launcher_types;

pub use launcher_core::{ChromeLauncher, ChromeProcess};
pub use launcher_types::{LaunchError, LaunchOptions};

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
