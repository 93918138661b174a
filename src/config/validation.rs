//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the upstream URL
//! - Validate value ranges (timeouts > 0, history days > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - A zero TTL or cooldown is allowed and simply disables that behavior

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::DashboardConfig;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },
}

/// Check a parsed config, collecting every problem found.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if Url::parse(&config.crypto.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "crypto.base_url",
            value: config.crypto.base_url.clone(),
        });
    }
    if config.crypto.vs_currency.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "crypto.vs_currency" });
    }
    if config.crypto.history_days == 0 {
        errors.push(ValidationError::Zero { field: "crypto.history_days" });
    }
    if config.crypto.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "crypto.timeout_secs" });
    }
    if config.crypto.history_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "crypto.history_timeout_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::Empty { field: "admin.api_key" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DashboardConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = DashboardConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.crypto.base_url = "::nope".to_string();
        config.crypto.history_days = 0;
        config.crypto.vs_currency = " ".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "crypto.history_days" }));
        assert!(errors.contains(&ValidationError::Empty { field: "crypto.vs_currency" }));
    }

    #[test]
    fn test_zero_ttl_allowed() {
        let mut config = DashboardConfig::default();
        config.cache.ttl_secs = 0;
        config.cache.cooldown_secs = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = DashboardConfig::default();
        config.observability.metrics_address = "bogus".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }
}
