//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Map every handler failure to a status code and `{ "error": ... }` body
//! - Keep unexpected failure details in the logs, out of responses
//!
//! # Design Decisions
//! - 401 for "no session", 403 for "session without privilege", everywhere
//! - Rate-limit rejections carry `Retry-After` in whole seconds

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::content::FieldError;
use crate::security::{AuthError, RateLimitExceeded};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),
    #[error("{0} not found")]
    NotFound(String),
    /// Detail is logged, never returned.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if matches!(err, StoreError::DuplicateSlug { .. }) {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Unexpected(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Unexpected(detail) => {
                tracing::error!(error = %detail, "Request failed unexpectedly");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if let ApiError::RateLimited(limit) = &self {
            let secs = limit.retry_after_ms.div_ceil(1000).max(1);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Body returned by successful deletes.
pub fn deleted() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("title: is required".into()), 400),
            (ApiError::Auth(AuthError::Unauthenticated), 401),
            (ApiError::Auth(AuthError::Forbidden), 403),
            (ApiError::not_found("page"), 404),
            (ApiError::RateLimited(RateLimitExceeded { retry_after_ms: 10 }), 429),
            (ApiError::Unexpected("disk full".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status().as_u16(), status);
        }
    }

    #[tokio::test]
    async fn test_unexpected_detail_hidden() {
        let body = body_json(ApiError::Unexpected("disk full".into()).into_response()).await;
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_retry_after_rounds_up() {
        let response = ApiError::RateLimited(RateLimitExceeded { retry_after_ms: 1500 }).into_response();
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Too many requests"));
    }

    #[test]
    fn test_duplicate_slug_is_validation() {
        let err: ApiError = StoreError::DuplicateSlug {
            kind: "pages",
            slug: "about".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
