use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::{parse_id, Record, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ResourceService, ServiceError};

use super::candidate;

/// PATCH|PUT /api/:resource/:id - Apply a partial update
///
/// Only the recognised, non-empty fields of the body are written; every
/// other field keeps its stored value.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<AuthUser>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record<R>> {
    let descriptor = R::DESCRIPTOR;
    let id = parse_id(&id).ok_or_else(ApiError::invalid_id)?;
    let patch = ResourceService::<R>::verify_update(&candidate(payload)?)?;

    let service = state.service::<R>();
    let existing = service.find_one_by_id(id).await?;

    // Renaming onto another record's key is a duplicate
    if let Some(key) = patch.get(descriptor.unique_key()).and_then(Value::as_str) {
        match service.find_one_by_key(key).await {
            Ok(other) if other.id != existing.id => {
                return Err(ApiError::forbidden(descriptor.duplicate_message));
            }
            Ok(_) | Err(ServiceError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let updated = service.update_one_by_id(&existing, patch).await?;

    tracing::info!(
        collection = descriptor.collection.name,
        id = %updated.id,
        actor = user.as_ref().map(|Extension(u)| u.id.as_str()),
        "updated record"
    );
    Ok(ApiResponse::success(updated))
}
