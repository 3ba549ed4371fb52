//! Browser automation for the ADRES affiliation scraper.
//!
//! Drives a locally launched Chrome through the Chrome DevTools Protocol (CDP).
//! Pure Rust, no WebDriver binary required.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  BrowserDriver  ┌─────────────┐   WebSocket   ┌──────────────┐
//! │  adres-scraper  │ ──────────────► │  CdpDriver  │ ◄───────────► │    Chrome    │
//! │  (pipeline)     │  Focus-addressed│  (this crate)│      CDP      │ (launched per│
//! └─────────────────┘   operations    └─────────────┘               │   session)   │
//!                                                                   └──────────────┘
//! ```
//!
//! ## Focus
//!
//! WebDriver-style APIs keep a hidden "current window" and "current frame".
//! Here every element operation receives a [`Focus`] token naming the window
//! and, optionally, the iframe it targets, of any origin. The driver itself holds
//! no focus state.
//!
//! ## Launching
//!
//! [`ChromeLauncher`] starts Chrome with a throwaway profile and an ephemeral
//! DevTools port. The returned [`ChromeProcess`] is killed on drop, so a
//! browser never outlives the session that owns it.

pub mod cdp;
pub mod driver;
pub mod launcher;
pub mod version;

pub use cdp::{CdpClient, CdpError, CdpTimeouts, PageSession};
pub use driver::{
    BrowserDriver, CdpDriver, CellKind, CellSnapshot, DriverError, Focus, FrameRef, RowSnapshot,
    TableSnapshot, Wait, WindowHandle,
};
pub use launcher::{ChromeLauncher, ChromeProcess, LaunchError, LaunchOptions};
pub use version::{ChromeVersion, VersionCheck};
