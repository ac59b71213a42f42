//! Session resolution and the admin authorization gate.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CmsConfig;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Superadmin,
}

/// The caller as resolved from request credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Insufficient privileges")]
    Forbidden,
}

/// Reject anyone who is not a signed-in superadmin.
///
/// No session is always `Unauthenticated` (401); a session with any other
/// role is always `Forbidden` (403). The session is handed back on success.
pub fn ensure_privileged(user: Option<Session>) -> Result<Session, AuthError> {
    match user {
        None => {
            tracing::debug!("Rejected admin request without session");
            metrics::record_auth_rejection("unauthenticated");
            Err(AuthError::Unauthenticated)
        }
        Some(session) if session.role != Role::Superadmin => {
            tracing::debug!(user_id = %session.user_id, role = ?session.role, "Rejected admin request");
            metrics::record_auth_rejection("forbidden");
            Err(AuthError::Forbidden)
        }
        Some(session) => Ok(session),
    }
}

/// Turns request credentials into a session.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<Session>;
}

/// Resolves bearer tokens against the live configuration.
pub struct ConfigTokenResolver {
    config: Arc<ArcSwap<CmsConfig>>,
}

impl ConfigTokenResolver {
    pub fn new(config: Arc<ArcSwap<CmsConfig>>) -> Self {
        Self { config }
    }
}

impl SessionResolver for ConfigTokenResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let presented = bearer_token(headers)?;
        let config = self.config.load();
        config
            .auth
            .tokens
            .iter()
            .find(|t| t.token == presented)
            .map(|t| Session {
                user_id: t.user_id.clone(),
                role: t.role,
            })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiToken;
    use axum::http::HeaderValue;

    fn session(role: Role) -> Session {
        Session {
            user_id: "u-1".into(),
            role,
        }
    }

    #[test]
    fn test_gate_outcomes() {
        assert_eq!(ensure_privileged(None), Err(AuthError::Unauthenticated));
        assert_eq!(ensure_privileged(Some(session(Role::User))), Err(AuthError::Forbidden));
        assert_eq!(
            ensure_privileged(Some(session(Role::Superadmin))),
            Ok(session(Role::Superadmin))
        );
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Superadmin).unwrap(), "\"SUPERADMIN\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_resolver_follows_config_swaps() {
        let mut config = CmsConfig::default();
        config.auth.tokens.push(ApiToken {
            token: "t-admin".into(),
            user_id: "admin".into(),
            role: Role::Superadmin,
        });
        let live = Arc::new(ArcSwap::from_pointee(config));
        let resolver = ConfigTokenResolver::new(live.clone());

        let mut headers = HeaderMap::new();
        assert_eq!(resolver.resolve(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer t-admin"));
        assert_eq!(resolver.resolve(&headers), Some(session_for("admin", Role::Superadmin)));

        // Token revoked by a reload.
        live.store(Arc::new(CmsConfig::default()));
        assert_eq!(resolver.resolve(&headers), None);
    }

    #[test]
    fn test_non_bearer_scheme_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }

    fn session_for(user_id: &str, role: Role) -> Session {
        Session {
            user_id: user_id.into(),
            role,
        }
    }
}
