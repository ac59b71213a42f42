use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::auth::Admin;
use crate::content::{Record, Resource};
use crate::http::response::deleted;
use crate::http::{ApiError, AppState, JsonBody, Pagination};
use crate::observability::metrics;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub content: BTreeMap<&'static str, usize>,
    pub rate_limit_buckets: usize,
    pub user_id: String,
}

pub async fn get_status(Admin(session): Admin, State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        content: state.store.counts(),
        rate_limit_buckets: state.limiter.tracked_buckets(),
        user_id: session.user_id,
    })
}

pub async fn list_all<T: Resource>(
    _admin: Admin,
    State(state): State<AppState>,
    page: Pagination,
) -> Json<Vec<Record<T>>> {
    Json(page.apply(T::collection(&state.store).list()))
}

pub async fn get_one<T: Resource>(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record<T>>, ApiError> {
    let id = parse_id(&id)?;
    T::collection(&state.store)
        .get(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(T::KIND))
}

pub async fn create<T: Resource>(
    Admin(session): Admin,
    State(state): State<AppState>,
    JsonBody(data): JsonBody<T>,
) -> Result<(StatusCode, Json<Record<T>>), ApiError> {
    let record = create_record(&state, data)?;
    tracing::info!(kind = T::KIND, id = %record.id, user_id = %session.user_id, "Content created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<T: Resource>(
    Admin(session): Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(mut data): JsonBody<T>,
) -> Result<Json<Record<T>>, ApiError> {
    let id = parse_id(&id)?;
    data.normalize();
    data.validate()?;
    data.check_references(&state.store)?;

    let collection = T::collection(&state.store);
    let (record, previous) = collection
        .replace(id, data)?
        .ok_or_else(|| ApiError::not_found(T::KIND))?;
    persist_or_undo(&state, || collection.put_back(previous))?;

    metrics::record_mutation(T::KIND, "update");
    tracing::info!(kind = T::KIND, id = %record.id, user_id = %session.user_id, "Content updated");
    Ok(Json(record))
}

pub async fn delete<T: Resource>(
    Admin(session): Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let collection = T::collection(&state.store);
    let removed = collection
        .remove(id)
        .ok_or_else(|| ApiError::not_found(T::KIND))?;
    persist_or_undo(&state, || collection.put_back(removed))?;

    metrics::record_mutation(T::KIND, "delete");
    tracing::info!(kind = T::KIND, id = %id, user_id = %session.user_id, "Content deleted");
    Ok(deleted())
}

/// Normalize, validate, insert and persist one item.
pub(crate) fn create_record<T: Resource>(state: &AppState, mut data: T) -> Result<Record<T>, ApiError> {
    data.normalize();
    data.validate()?;
    data.check_references(&state.store)?;

    let collection = T::collection(&state.store);
    let record = collection.insert(data)?;
    persist_or_undo(state, || {
        collection.remove(record.id);
    })?;
    metrics::record_mutation(T::KIND, "create");
    Ok(record)
}

/// Save the store, reverting the in-memory change if the write fails.
fn persist_or_undo(state: &AppState, undo: impl FnOnce()) -> Result<(), ApiError> {
    if let Err(err) = state.store.persist() {
        undo();
        return Err(err.into());
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("'{raw}' is not a valid id")))
}
