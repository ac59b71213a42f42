use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    Json,
};

use crate::admin::handlers::create_record;
use crate::content::{Inquiry, Record, Resource};
use crate::http::{ApiError, AppState, ClientAddress, JsonBody, Pagination};

/// Published items of one kind. Rate limited per caller and path.
///
/// The query string is decoded after the limiter so malformed requests
/// still count against the caller.
pub async fn list_published<T: Resource>(
    State(state): State<AppState>,
    ClientAddress(address): ClientAddress,
    uri: Uri,
) -> Result<Json<Vec<Record<T>>>, ApiError> {
    let config = state.config.load();
    if config.rate_limit.enabled {
        state
            .limiter
            .check_policy(T::KIND, &config.rate_limit.list, &address, uri.path())?;
    }

    let page = Pagination::from_uri(&uri)?;
    Ok(Json(page.apply(T::collection(&state.store).list_public())))
}

/// One published item by slug or id.
pub async fn get_published<T: Resource>(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Record<T>>, ApiError> {
    T::collection(&state.store)
        .find(&key)
        .filter(|r| r.data.is_public())
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("{} '{key}'", T::KIND)))
}

/// Contact form submission.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    ClientAddress(address): ClientAddress,
    uri: Uri,
    JsonBody(inquiry): JsonBody<Inquiry>,
) -> Result<(StatusCode, Json<Record<Inquiry>>), ApiError> {
    let config = state.config.load();
    if config.rate_limit.enabled {
        state
            .limiter
            .check_policy(Inquiry::KIND, &config.rate_limit.inquiry, &address, uri.path())?;
    }

    let record = create_record(&state, inquiry)?;
    tracing::info!(id = %record.id, client = %address, "Inquiry received");
    Ok((StatusCode::CREATED, Json(record)))
}
