use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::database::{Record, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ResourceService, ServiceError};

use super::candidate;

/// POST /api/:resource - Create a record
///
/// 400 when a required field is missing, 403 when the unique key is
/// already taken, 503 when the store writes nothing, 201 with the record
/// otherwise.
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record<R>> {
    let descriptor = R::DESCRIPTOR;
    let fields = ResourceService::<R>::verify_fields(&candidate(payload)?)?;

    let key = fields
        .get(descriptor.unique_key())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let service = state.service::<R>();
    match service.find_one_by_key(&key).await {
        Ok(_) => return Err(ApiError::forbidden(descriptor.duplicate_message)),
        Err(ServiceError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let record = service.create(fields).await?;

    tracing::info!(
        collection = descriptor.collection.name,
        id = %record.id,
        actor = user.as_ref().map(|Extension(u)| u.id.as_str()),
        "created record"
    );
    Ok(ApiResponse::created(record))
}
