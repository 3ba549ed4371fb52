//! Focus-addressed browser driver.
//!
//! [`BrowserDriver`] is the seam between the scraping pipeline and the
//! browser. Every element operation takes the [`Focus`] it applies to, so
//! window and frame switches are values the caller threads through instead
//! of hidden driver state.

mod cdp_driver;
mod driver_types;
mod scripts;
mod wait;

use async_trait::async_trait;

pub use cdp_driver::CdpDriver;
pub use driver_types::{
    CellKind, CellSnapshot, DriverError, Focus, FrameRef, RowSnapshot, TableSnapshot, WindowHandle,
};
pub use wait::Wait;

/// Browser operations the scraping pipeline relies on.
///
/// Element ids are DOM `id` attributes. All calls are bounded by the
/// transport's per-command timeout; longer waits are composed with [`Wait`].
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// The window the session was opened with.
    fn primary_window(&self) -> WindowHandle;

    /// Load `url` in the focused window's top-level document.
    async fn navigate(&self, focus: &Focus, url: &str) -> Result<(), DriverError>;

    /// All top-level windows currently open.
    async fn window_handles(&self) -> Result<Vec<WindowHandle>, DriverError>;

    /// Iframes of the focused window's top-level document, in document order.
    async fn frames(&self, focus: &Focus) -> Result<Vec<FrameRef>, DriverError>;

    async fn element_exists(&self, focus: &Focus, id: &str) -> Result<bool, DriverError>;

    /// Present, rendered with a non-empty box, visible and not disabled.
    async fn element_interactable(&self, focus: &Focus, id: &str) -> Result<bool, DriverError>;

    /// Select the option with `value` in a `<select>` and fire `change`.
    async fn select_option(&self, focus: &Focus, id: &str, value: &str) -> Result<(), DriverError>;

    /// Click the element's center with real mouse events.
    async fn click(&self, focus: &Focus, id: &str) -> Result<(), DriverError>;

    /// Empty an input's value.
    async fn clear(&self, focus: &Focus, id: &str) -> Result<(), DriverError>;

    /// Send one keystroke to whatever element has keyboard focus in the window.
    async fn type_char(&self, focus: &Focus, ch: char) -> Result<(), DriverError>;

    async fn body_present(&self, focus: &Focus) -> Result<bool, DriverError>;

    /// Whether the document's text contains `phrase` (exact, case-sensitive).
    async fn text_contains(&self, focus: &Focus, phrase: &str) -> Result<bool, DriverError>;

    /// Rendered text of every table in the focused document, in document order.
    async fn tables(&self, focus: &Focus) -> Result<Vec<TableSnapshot>, DriverError>;

    /// Close the browser. Further calls fail.
    async fn quit(&self) -> Result<(), DriverError>;
}
