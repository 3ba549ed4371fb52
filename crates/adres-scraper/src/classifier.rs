//! Result classification: "not registered" versus a record.

use adres_browser::{BrowserDriver, DriverError, Focus, TableSnapshot, Wait};
use adres_config::{PortalConfig, TimingConfig};
use tracing::{debug, info, warn};

use crate::error::ScrapeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The window states the identity has no registry record.
    NotFound,
    /// Tables captured from the window, in document order.
    RecordFound(Vec<TableSnapshot>),
}

/// Decides what the result window is showing.
///
/// The not-found phrase is checked first and wins: tables are never read
/// once it has been seen. Otherwise the window is polled for either the
/// phrase or at least one table until the table wait runs out.
pub struct ResultClassifier {
    not_found_phrase: String,
    table_wait: Wait,
}

impl ResultClassifier {
    pub fn new(portal: &PortalConfig, timing: &TimingConfig) -> Self {
        Self {
            not_found_phrase: portal.not_found_phrase.clone(),
            table_wait: Wait::new(timing.table_wait(), timing.poll_interval()),
        }
    }

    pub async fn classify(
        &self,
        driver: &dyn BrowserDriver,
        popup: &Focus,
    ) -> Result<Classification, ScrapeError> {
        let phrase = self.not_found_phrase.as_str();

        match driver.text_contains(popup, phrase).await {
            Ok(true) => {
                info!("Identity is not registered");
                return Ok(Classification::NotFound);
            }
            Ok(false) => {}
            Err(e) => debug!("Phrase check failed, polling: {}", e),
        }

        let classification = self
            .table_wait
            .until("result tables", || async move {
                if driver.text_contains(popup, phrase).await? {
                    return Ok::<_, DriverError>(Some(Classification::NotFound));
                }
                let tables = driver.tables(popup).await?;
                Ok((!tables.is_empty()).then_some(Classification::RecordFound(tables)))
            })
            .await
            .map_err(|e| {
                warn!("Result window showed neither a record nor the not-found text: {}", e);
                ScrapeError::IndeterminateResult
            })?;

        match &classification {
            Classification::NotFound => info!("Identity is not registered"),
            Classification::RecordFound(tables) => info!("Captured {} result table(s)", tables.len()),
        }
        Ok(classification)
    }
}
