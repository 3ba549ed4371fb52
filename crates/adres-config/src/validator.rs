//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a `ConfigError`, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_portal(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_server(config, &mut result);

        result
    }

    fn validate_portal(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.portal.url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    result.add_error(ValidationError::new(
                        "portal.url",
                        "url must start with http:// or https://",
                    ));
                }
            }
            Err(e) => {
                result.add_error(ValidationError::new(
                    "portal.url",
                    format!("Invalid URL: {}", e),
                ));
            }
        }

        if config.portal.not_found_phrase.trim().is_empty() {
            result.add_error(ValidationError::new(
                "portal.not_found_phrase",
                "not_found_phrase cannot be empty",
            ));
        }

        let ids = [
            ("portal.input_id", &config.portal.input_id),
            ("portal.document_type_id", &config.portal.document_type_id),
            ("portal.submit_id", &config.portal.submit_id),
        ];
        for (path, id) in ids {
            if id.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Element id cannot be empty"));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.launch_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_ms",
                "launch_timeout_ms must be greater than 0",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome executable does not exist: {:?}", path),
                ));
            }
        }

        if !config.browser.headless {
            result.add_warning(ValidationWarning::new(
                "browser.headless",
                "headless is disabled, a display is required",
            ));
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;
        let waits = [
            ("timing.page_wait_secs", timing.page_wait_secs),
            ("timing.popup_wait_secs", timing.popup_wait_secs),
            ("timing.body_wait_secs", timing.body_wait_secs),
            ("timing.table_wait_secs", timing.table_wait_secs),
            ("timing.command_timeout_secs", timing.command_timeout_secs),
        ];
        for (path, secs) in waits {
            if secs == 0 {
                result.add_error(ValidationError::new(path, "wait bound must be greater than 0"));
            }
        }

        if timing.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if timing.poll_interval() > timing.shortest_wait() {
            result.add_warning(ValidationWarning::new(
                "timing.poll_interval_ms",
                "poll interval is longer than the shortest wait bound",
            ));
        }

        if timing.keystroke_delay_ms > 1000 {
            result.add_warning(ValidationWarning::new(
                "timing.keystroke_delay_ms",
                "keystroke delay is very high (>1000ms), input will be slow",
            ));
        }
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        if config.server.max_concurrent_queries == 0 {
            result.add_error(ValidationError::new(
                "server.max_concurrent_queries",
                "max_concurrent_queries must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
