//! Result window handling.

use adres_browser::{BrowserDriver, DriverError, Focus, Wait, WindowHandle};
use adres_config::TimingConfig;
use tracing::{debug, info, warn};

use crate::error::ScrapeError;

/// Windows that were open before the query was submitted.
#[derive(Debug, Clone)]
pub struct PendingPopup {
    known: Vec<WindowHandle>,
}

impl PendingPopup {
    pub fn known(&self) -> &[WindowHandle] {
        &self.known
    }
}

/// Detects the result window the portal opens on submit and moves focus to it.
pub struct PopupCoordinator {
    popup_wait: Wait,
    body_wait: Wait,
}

impl PopupCoordinator {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            popup_wait: Wait::new(timing.popup_wait(), timing.poll_interval()),
            body_wait: Wait::new(timing.body_wait(), timing.poll_interval()),
        }
    }

    /// Snapshot the open windows. Call right before submitting.
    pub async fn watch(&self, driver: &dyn BrowserDriver) -> Result<PendingPopup, ScrapeError> {
        let known = driver.window_handles().await?;
        debug!("{} window(s) open before submit", known.len());
        Ok(PendingPopup { known })
    }

    /// Wait for a window that was not open at [`PopupCoordinator::watch`]
    /// time, then for its document body.
    pub async fn follow(
        &self,
        driver: &dyn BrowserDriver,
        pending: &PendingPopup,
    ) -> Result<Focus, ScrapeError> {
        let expected = pending.known.len() + 1;

        let handle = self
            .popup_wait
            .until("result window", || async move {
                let handles = driver.window_handles().await?;
                if handles.len() < expected {
                    return Ok::<_, DriverError>(None);
                }
                Ok(handles.into_iter().find(|h| !pending.known.contains(h)))
            })
            .await
            .map_err(|e| {
                warn!("Result window never opened: {}", e);
                ScrapeError::NoResultWindow
            })?;

        let popup = Focus::top(handle);
        info!("Result window {} opened", popup);

        let focus = &popup;
        self.body_wait
            .until_true("result body", || async move { driver.body_present(focus).await })
            .await
            .map_err(|e| {
                warn!("Result window has no body: {}", e);
                ScrapeError::IndeterminateResult
            })?;

        Ok(popup)
    }
}
