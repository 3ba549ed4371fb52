//! Navigation operations for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Navigate to URL and wait until the document is interactive.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::Navigation(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();

        self.wait_for_load().await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for page load, bounded by the client's page-load timeout.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let timeouts = *self.transport.timeouts();
        let start = tokio::time::Instant::now();

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if Self::is_loaded(state) {
                    return Ok(());
                }
            }

            if start.elapsed() > timeouts.page_load {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(timeouts.poll_interval).await;
        }
    }

    pub(super) fn is_loaded(ready_state: &str) -> bool {
        ready_state == "complete" || ready_state == "interactive"
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
