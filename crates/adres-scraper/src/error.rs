//! Scrape error types.

use adres_browser::{DriverError, LaunchError};
use thiserror::Error;

/// Why an attempt ended in [`Outcome::Failed`](crate::Outcome::Failed).
///
/// Errors carry their cause as text so outcomes stay `Clone` and comparable;
/// the underlying error is logged where it is converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("form frame not found")]
    Discovery,

    #[error("input unavailable")]
    InputUnavailable,

    #[error("submit unavailable")]
    SubmitUnavailable,

    #[error("no result window")]
    NoResultWindow,

    #[error("indeterminate result")]
    IndeterminateResult,

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("attempt panicked")]
    Panicked,
}

impl From<DriverError> for ScrapeError {
    fn from(e: DriverError) -> Self {
        ScrapeError::Browser(e.to_string())
    }
}

impl From<LaunchError> for ScrapeError {
    fn from(e: LaunchError) -> Self {
        ScrapeError::Launch(e.to_string())
    }
}
