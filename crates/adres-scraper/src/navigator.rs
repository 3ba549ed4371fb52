//! Portal navigation: reach the query form and fill it in.

use std::time::Duration;

use adres_browser::{BrowserDriver, DriverError, Focus, Wait};
use adres_config::{PortalConfig, TimingConfig};
use tracing::{debug, info, warn};

use crate::error::ScrapeError;
use crate::record::QueryRequest;

/// Drives the entry page up to the moment the query is submitted.
///
/// The form is embedded in an iframe whose position on the page is not
/// stable, so each frame is probed for the identity input. When no frame
/// has it, the top-level document is used as a fallback.
pub struct PageNavigator {
    portal: PortalConfig,
    page_wait: Wait,
    keystroke_delay: Duration,
}

impl PageNavigator {
    pub fn new(portal: PortalConfig, timing: &TimingConfig) -> Self {
        Self {
            portal,
            page_wait: Wait::new(timing.page_wait(), timing.poll_interval()),
            keystroke_delay: timing.keystroke_delay(),
        }
    }

    /// Open the entry page and fill in the form. Returns the focus the form
    /// lives in, ready for [`PageNavigator::submit`].
    pub async fn prepare(
        &self,
        driver: &dyn BrowserDriver,
        top: &Focus,
        request: &QueryRequest,
    ) -> Result<Focus, ScrapeError> {
        self.open(driver, top).await?;
        let form = self.locate_form(driver, top).await;
        self.select_document_type(driver, &form).await;
        self.enter_identity(driver, &form, request).await?;
        Ok(form)
    }

    pub async fn open(&self, driver: &dyn BrowserDriver, top: &Focus) -> Result<(), ScrapeError> {
        info!("Opening {}", self.portal.url);
        driver.navigate(top, &self.portal.url).await?;
        Ok(())
    }

    /// Find the iframe holding the identity input.
    pub async fn discover_form_frame(
        &self,
        driver: &dyn BrowserDriver,
        top: &Focus,
    ) -> Result<Focus, ScrapeError> {
        let frames = self
            .page_wait
            .until("an iframe", || async move {
                let frames = driver.frames(top).await?;
                Ok::<_, DriverError>((!frames.is_empty()).then_some(frames))
            })
            .await
            .map_err(|e| {
                debug!("No iframe appeared: {}", e);
                ScrapeError::Discovery
            })?;

        debug!("Probing {} frames for #{}", frames.len(), self.portal.input_id);

        for frame in frames {
            let candidate = top.in_frame(frame);
            match driver.element_exists(&candidate, &self.portal.input_id).await {
                Ok(true) => return Ok(candidate),
                Ok(false) => {}
                Err(e) => debug!("Skipping frame {}: {}", candidate, e),
            }
        }

        Err(ScrapeError::Discovery)
    }

    /// Discovery with fallback: a failed discovery is logged, not fatal.
    pub async fn locate_form(&self, driver: &dyn BrowserDriver, top: &Focus) -> Focus {
        match self.discover_form_frame(driver, top).await {
            Ok(form) => {
                debug!("Form found in {}", form);
                form
            }
            Err(e) => {
                warn!("{}; using the top-level document", e);
                top.to_top()
            }
        }
    }

    /// Best effort: returns whether the document type was selected.
    pub async fn select_document_type(&self, driver: &dyn BrowserDriver, form: &Focus) -> bool {
        let id = &self.portal.document_type_id;

        match driver.element_exists(form, id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("No #{} control; keeping the default document type", id);
                return false;
            }
            Err(e) => {
                debug!("Could not look for #{}: {}", id, e);
                return false;
            }
        }

        if let Err(e) = self
            .page_wait
            .until_true("document type control", || driver.element_interactable(form, id))
            .await
        {
            warn!("Document type control never became usable: {}", e);
            return false;
        }

        match driver.select_option(form, id, &self.portal.document_type).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not select document type {}: {}", self.portal.document_type, e);
                false
            }
        }
    }

    /// Click the input, clear it and type the identity one keystroke at a time.
    pub async fn enter_identity(
        &self,
        driver: &dyn BrowserDriver,
        form: &Focus,
        request: &QueryRequest,
    ) -> Result<(), ScrapeError> {
        let id = &self.portal.input_id;

        self.page_wait
            .until_true("identity input", || driver.element_interactable(form, id))
            .await
            .map_err(|e| {
                warn!("Identity input unavailable: {}", e);
                ScrapeError::InputUnavailable
            })?;

        let typed = async {
            driver.click(form, id).await?;
            driver.clear(form, id).await?;
            for ch in request.identity().chars() {
                driver.type_char(form, ch).await?;
                tokio::time::sleep(self.keystroke_delay).await;
            }
            Ok::<_, DriverError>(())
        };

        typed.await.map_err(|e| {
            warn!("Typing into the identity input failed: {}", e);
            ScrapeError::InputUnavailable
        })
    }

    pub async fn submit(&self, driver: &dyn BrowserDriver, form: &Focus) -> Result<(), ScrapeError> {
        let id = &self.portal.submit_id;

        match driver.element_exists(form, id).await {
            Ok(true) => {}
            Ok(false) => return Err(ScrapeError::SubmitUnavailable),
            Err(e) => {
                warn!("Could not look for #{}: {}", id, e);
                return Err(ScrapeError::SubmitUnavailable);
            }
        }

        driver.click(form, id).await.map_err(|e| {
            warn!("Clicking #{} failed: {}", id, e);
            ScrapeError::SubmitUnavailable
        })?;

        info!("Query submitted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "navigator_tests.rs"]
mod tests;
