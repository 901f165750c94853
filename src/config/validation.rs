//! Configuration validation.
//!
//! Semantic checks on top of what serde enforces. Every violation found is
//! reported, not just the first.

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::FailoverConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic violations.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "api.bind_address",
            format!("not a valid socket address: {:?}", config.api.bind_address),
        ));
    }

    if config.pooler.host.is_empty() {
        errors.push(ValidationError::new("pooler.host", "must not be empty"));
    }
    if config.pooler.port == 0 {
        errors.push(ValidationError::new("pooler.port", "must not be zero"));
    }
    if config.pooler.user.is_empty() {
        errors.push(ValidationError::new("pooler.user", "must not be empty"));
    }
    if config.pooler.database.is_empty() {
        errors.push(ValidationError::new("pooler.database", "must not be empty"));
    }
    if config.pooler.connect_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "pooler.connect_timeout_ms",
            "must be greater than zero",
        ));
    }
    if config.pooler.exec_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "pooler.exec_timeout_ms",
            "must be greater than zero",
        ));
    }

    if config.stream.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "stream.poll_interval_ms",
            "must be greater than zero",
        ));
    }
    if config.stream.watch_retry_interval_ms == 0 {
        errors.push(ValidationError::new(
            "stream.watch_retry_interval_ms",
            "must be greater than zero",
        ));
    }
    if config.stream.get_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "stream.get_timeout_ms",
            "must be greater than zero",
        ));
    }

    let mut seen = HashSet::new();
    for key in &config.stream.keys {
        if key.is_empty() {
            errors.push(ValidationError::new("stream.keys", "contains an empty key"));
        } else if !seen.insert(key.as_str()) {
            errors.push(ValidationError::new(
                "stream.keys",
                format!("duplicate key {:?}", key),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
