use axum::{extract::FromRequestParts, http::request::Parts};

use crate::http::{ApiError, AppState};
use crate::security::{ensure_privileged, Session};

/// A caller that passed the authorization gate.
///
/// Extracted before the request body, so unauthorized callers are rejected
/// before any decoding or data access.
pub struct Admin(pub Session);

impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = ensure_privileged(state.sessions.resolve(&parts.headers))?;
        Ok(Admin(session))
    }
}
