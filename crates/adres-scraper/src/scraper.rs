//! The query pipeline and its public entry point.

use std::sync::Arc;

use adres_config::Config;
use async_trait::async_trait;
use tracing::{info, info_span, warn, Instrument};

use crate::classifier::{Classification, ResultClassifier};
use crate::error::ScrapeError;
use crate::extractor::TableExtractor;
use crate::lifecycle::{
    BrowserSession, ChromeSessionFactory, SessionAttempt, SessionFactory, SessionLifecycle,
};
use crate::navigator::PageNavigator;
use crate::popup::PopupCoordinator;
use crate::record::{Outcome, QueryRequest};

/// One pass through the portal: navigate, submit, follow the result
/// window, classify, extract.
pub struct QueryFlow {
    navigator: PageNavigator,
    popups: PopupCoordinator,
    classifier: ResultClassifier,
    extractor: TableExtractor,
}

impl QueryFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            navigator: PageNavigator::new(config.portal.clone(), &config.timing),
            popups: PopupCoordinator::new(&config.timing),
            classifier: ResultClassifier::new(&config.portal, &config.timing),
            extractor: TableExtractor::new(),
        }
    }

    async fn execute(
        &self,
        session: &BrowserSession,
        request: &QueryRequest,
    ) -> Result<Outcome, ScrapeError> {
        let driver = session.driver();
        let top = session.primary_focus();

        let form = self.navigator.prepare(driver, &top, request).await?;

        let pending = self.popups.watch(driver).await?;
        self.navigator.submit(driver, &form).await?;
        let popup = self.popups.follow(driver, &pending).await?;

        match self.classifier.classify(driver, &popup).await? {
            Classification::NotFound => Ok(Outcome::NotFound),
            Classification::RecordFound(tables) => {
                let extraction = self.extractor.extract(&tables);
                info!(
                    "Extracted {} field(s) with {} anomaly(ies)",
                    extraction.record.len(),
                    extraction.anomalies.len()
                );
                Ok(Outcome::Found(extraction.record))
            }
        }
    }
}

#[async_trait]
impl SessionAttempt for QueryFlow {
    async fn attempt(&self, session: &BrowserSession, request: &QueryRequest) -> Outcome {
        match self.execute(session, request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Query failed: {}", e);
                Outcome::Failed(e)
            }
        }
    }
}

/// Looks up identities on the portal, one fresh browser per lookup.
///
/// ```no_run
/// # async fn run() {
/// use adres_config::Config;
/// use adres_scraper::{AdresScraper, Outcome, QueryRequest};
///
/// let scraper = AdresScraper::from_config(&Config::default());
/// match scraper.consult(&QueryRequest::new("1234567890")).await {
///     Outcome::Found(record) => println!("{} fields", record.len()),
///     Outcome::NotFound => println!("not registered"),
///     Outcome::Failed(e) => println!("failed: {}", e),
/// }
/// # }
/// ```
pub struct AdresScraper {
    lifecycle: SessionLifecycle,
    flow: QueryFlow,
}

impl AdresScraper {
    pub fn from_config(config: &Config) -> Self {
        let factory = ChromeSessionFactory::from_config(&config.browser, &config.timing);
        Self::with_factory(config, Arc::new(factory))
    }

    pub fn with_factory(config: &Config, factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            lifecycle: SessionLifecycle::new(factory),
            flow: QueryFlow::new(config),
        }
    }

    /// Run one query to completion. The browser is gone when this returns.
    pub async fn consult(&self, request: &QueryRequest) -> Outcome {
        let span = info_span!("consult", identity_len = request.identity().len());

        async {
            let outcome = self.lifecycle.run(&self.flow, request).await;
            info!("Query finished: {}", outcome.kind());
            outcome
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "scraper_tests.rs"]
mod tests;
