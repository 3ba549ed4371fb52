//! # ADRES Config
//!
//! Configuration for the ADRES affiliation scraper: the portal location and
//! element ids, browser launch options, the bounded wait durations and the
//! HTTP boundary settings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
