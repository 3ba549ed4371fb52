//! Browser version adapter.
//!
//! The portal flow is verified against a specific Chrome major version.
//! Instead of patching a version-comparison utility at runtime, the running
//! browser's version string is parsed here and compared numerically.

use std::cmp::Ordering;
use std::fmt;

/// A parsed `Product/1.2.3.4` version string, as reported by `/json/version`.
#[derive(Debug, Clone)]
pub struct ChromeVersion {
    product: String,
    components: Vec<u32>,
}

/// Outcome of comparing the running browser against the pinned major version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// No version pinned.
    Unpinned,
    Matches,
    Mismatch { expected: u32, actual: u32 },
}

impl ChromeVersion {
    /// Parse strings like `HeadlessChrome/142.0.7444.59` or `Chrome/142.0.7444.59`.
    /// Non-numeric trailing parts of a component (`59-beta`) are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let (product, version) = raw.trim().split_once('/')?;
        let mut components = Vec::new();

        for part in version.split('.') {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                break;
            }
            components.push(digits.parse().ok()?);
        }

        if components.is_empty() {
            return None;
        }

        Some(Self {
            product: product.to_string(),
            components,
        })
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn major(&self) -> u32 {
        self.components.first().copied().unwrap_or(0)
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }

    pub fn is_headless(&self) -> bool {
        self.product.starts_with("Headless")
    }

    /// Compare against an optional pinned major version.
    pub fn check(&self, expected_major: Option<u32>) -> VersionCheck {
        match expected_major {
            None => VersionCheck::Unpinned,
            Some(expected) if expected == self.major() => VersionCheck::Matches,
            Some(expected) => VersionCheck::Mismatch {
                expected,
                actual: self.major(),
            },
        }
    }
}

impl PartialEq for ChromeVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ChromeVersion {}

impl PartialOrd for ChromeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric, component-wise; missing components count as zero.
impl Ord for ChromeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let a = self.components.get(i).copied().unwrap_or(0);
                let b = other.components.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for ChromeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}/{}", self.product, joined.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headless() {
        let v = ChromeVersion::parse("HeadlessChrome/142.0.7444.59").unwrap();
        assert_eq!(v.product(), "HeadlessChrome");
        assert_eq!(v.major(), 142);
        assert_eq!(v.components(), &[142, 0, 7444, 59]);
        assert!(v.is_headless());
    }

    #[test]
    fn test_parse_suffix() {
        let v = ChromeVersion::parse("Chrome/143.0.1-beta").unwrap();
        assert_eq!(v.components(), &[143, 0, 1]);
        assert!(!v.is_headless());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ChromeVersion::parse("Chrome").is_none());
        assert!(ChromeVersion::parse("Chrome/beta").is_none());
    }

    #[test]
    fn test_numeric_ordering() {
        let a = ChromeVersion::parse("Chrome/142.0.999.1").unwrap();
        let b = ChromeVersion::parse("Chrome/142.0.1000.0").unwrap();
        assert!(a < b);

        let short = ChromeVersion::parse("Chrome/142").unwrap();
        let long = ChromeVersion::parse("Chrome/142.0.0.0").unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_check() {
        let v = ChromeVersion::parse("Chrome/142.0.7444.59").unwrap();
        assert_eq!(v.check(None), VersionCheck::Unpinned);
        assert_eq!(v.check(Some(142)), VersionCheck::Matches);
        assert_eq!(
            v.check(Some(141)),
            VersionCheck::Mismatch {
                expected: 141,
                actual: 142
            }
        );
    }

    #[test]
    fn test_display() {
        let v = ChromeVersion::parse(" Chrome/142.0.7444.59 ").unwrap();
        assert_eq!(v.to_string(), "Chrome/142.0.7444.59");
    }
}
