//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows > 0, body limit > 0, addresses parse)
//! - Detect duplicate or empty bearer tokens
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CmsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{CmsConfig, WindowPolicy};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &CmsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    check_policy("rate_limit.list", &config.rate_limit.list, &mut errors);
    check_policy("rate_limit.inquiry", &config.rate_limit.inquiry, &mut errors);

    let mut seen = HashSet::new();
    for (i, token) in config.auth.tokens.iter().enumerate() {
        if token.token.trim().is_empty() {
            errors.push(ValidationError::new(format!("auth.tokens[{i}].token"), "must not be empty"));
        } else if !seen.insert(token.token.as_str()) {
            errors.push(ValidationError::new(format!("auth.tokens[{i}].token"), "duplicate token"));
        }
        if token.user_id.trim().is_empty() {
            errors.push(ValidationError::new(format!("auth.tokens[{i}].user_id"), "must not be empty"));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_policy(field: &str, policy: &WindowPolicy, errors: &mut Vec<ValidationError>) {
    if policy.window_ms == 0 {
        errors.push(ValidationError::new(format!("{field}.window_ms"), "must be greater than 0"));
    }
    if policy.max_requests == 0 {
        errors.push(ValidationError::new(format!("{field}.max_requests"), "must be greater than 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ApiToken;
    use crate::security::auth::Role;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CmsConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = CmsConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.rate_limit.list.window_ms = 0;
        config.rate_limit.inquiry.max_requests = 0;
        config.security.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "rate_limit.list.window_ms",
                "rate_limit.inquiry.max_requests",
                "security.max_body_size",
            ]
        );
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let mut config = CmsConfig::default();
        for user in ["a", "b"] {
            config.auth.tokens.push(ApiToken {
                token: "same".into(),
                user_id: user.into(),
                role: Role::Superadmin,
            });
        }
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "auth.tokens[1].token");
    }
}
