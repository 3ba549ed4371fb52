//! # ADRES Scraper
//!
//! Looks up a citizen's health-system affiliation on the ADRES BDUA portal,
//! which has no public API, by driving a real browser through the query form.
//!
//! ## Flow
//!
//! ```text
//! SessionLifecycle ── creates ──► BrowserSession (one Chrome, one attempt)
//!        │
//!        ▼
//! PageNavigator      entry page → form iframe → document type → digits
//!        │
//! PopupCoordinator   submit → wait for the second window → focus it
//!        │
//! ResultClassifier   "not found" phrase?  ──► Outcome::NotFound
//!        │ tables
//! TableExtractor     vertical + horizontal tables ──► Outcome::Found(record)
//!        │
//! SessionLifecycle ── tears down the session on every path
//! ```
//!
//! Every failure collapses into [`Outcome::Failed`]; the cause is logged.

mod classifier;
mod error;
mod extractor;
mod fields;
mod lifecycle;
mod navigator;
mod popup;
mod record;
mod scraper;

#[cfg(test)]
pub(crate) mod test_support;

pub use classifier::{Classification, ResultClassifier};
pub use error::ScrapeError;
pub use extractor::{clean_text, Extraction, ExtractionAnomaly, TableExtractor};
pub use fields::{lookup_label, CanonicalField, FIELD_DICTIONARY};
pub use lifecycle::{
    BrowserSession, ChromeSessionFactory, SessionAttempt, SessionFactory, SessionLifecycle,
};
pub use navigator::PageNavigator;
pub use popup::{PendingPopup, PopupCoordinator};
pub use record::{CanonicalRecord, Outcome, QueryRequest};
pub use scraper::{AdresScraper, QueryFlow};
