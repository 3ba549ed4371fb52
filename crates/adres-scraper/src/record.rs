//! Query inputs and outcomes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ScrapeError;
use crate::fields::CanonicalField;

/// One lookup: the identity document number, as typed into the portal.
///
/// Digit-only validation happens at the boundary; the scraper forwards
/// whatever it is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    identity: String,
}

impl QueryRequest {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Fields extracted from a result window, keyed by canonical name.
///
/// Only fields the portal actually showed are present. Built once by the
/// extractor and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    fields: BTreeMap<CanonicalField, String>,
}

impl CanonicalRecord {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl From<BTreeMap<CanonicalField, String>> for CanonicalRecord {
    fn from(fields: BTreeMap<CanonicalField, String>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(CanonicalField, String)> for CanonicalRecord {
    fn from_iter<I: IntoIterator<Item = (CanonicalField, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Result of one query attempt. Exactly one per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(CanonicalRecord),
    /// The registry states it has no record for the identity.
    NotFound,
    Failed(ScrapeError),
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn record(&self) -> Option<&CanonicalRecord> {
        match self {
            Outcome::Found(record) => Some(record),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Found(_) => "found",
            Outcome::NotFound => "not_found",
            Outcome::Failed(_) => "failed",
        }
    }
}
