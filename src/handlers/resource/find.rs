use axum::extract::{Path, Query, State};
use serde::Serialize;
use std::collections::HashMap;

use crate::app::AppState;
use crate::database::{parse_id, Record, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Either a single lookup or the whole collection
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Found<R> {
    One(Record<R>),
    Many(Vec<Record<R>>),
}

/// GET /api/:resource - List every record, or look one up by its unique
/// key when the key is given as a query parameter (`?roomCode=A1`).
pub async fn find<R: Resource>(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Found<R>> {
    let descriptor = R::DESCRIPTOR;
    let service = state.service::<R>();

    match query.get(descriptor.unique_key()).filter(|v| !v.is_empty()) {
        Some(key) => {
            let record = service.find_one_by_key(key).await?;
            Ok(ApiResponse::success(Found::One(record)))
        }
        None => {
            let records = service.find_all().await?;
            if records.is_empty() {
                return Err(ApiError::not_found(descriptor.none_found_message));
            }
            Ok(ApiResponse::success(Found::Many(records)))
        }
    }
}

/// GET /api/:resource/:id
pub async fn show<R: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Record<R>> {
    let id = parse_id(&id).ok_or_else(ApiError::invalid_id)?;
    let record = state.service::<R>().find_one_by_id(id).await?;
    Ok(ApiResponse::success(record))
}
