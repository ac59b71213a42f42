//! Request extraction.
//!
//! # Responsibilities
//! - Decode JSON bodies and query strings into the error envelope on failure
//! - Resolve the caller's source address
//! - Name request spans after the `x-request-id` assigned at the edge

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, Uri},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::Span;

use crate::http::response::ApiError;
use crate::security::client_address;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Upper bound for `?limit=`.
pub const MAX_PAGE_SIZE: usize = 100;

/// JSON request body. Malformed input becomes a 400 `{error}` response.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Caller address as used for rate limiting.
pub struct ClientAddress(pub String);

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(client_address(&parts.headers)))
    }
}

/// `?limit=&offset=` for list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Pagination {
    /// Decode from the query string of `uri`.
    pub fn from_uri(uri: &Uri) -> Result<Self, ApiError> {
        Query::<Pagination>::try_from_uri(uri)
            .map(|Query(p)| p)
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let limit = self.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
        items
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(limit)
            .collect()
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_uri(&parts.uri)
    }
}

/// Span for `TraceLayer` carrying method, path and request id.
pub fn make_span(request: &axum::http::Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
