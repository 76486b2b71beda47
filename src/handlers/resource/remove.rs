use axum::{
    extract::{Path, State},
    Extension,
};

use crate::app::AppState;
use crate::database::{parse_id, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// DELETE /api/:resource/:id - 204 with an empty body on success
pub async fn remove<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<()> {
    let id = parse_id(&id).ok_or_else(ApiError::invalid_id)?;

    let service = state.service::<R>();
    service.find_one_by_id(id).await?;
    service.remove(id).await?;

    tracing::info!(
        collection = R::DESCRIPTOR.collection.name,
        id = %id,
        actor = user.as_ref().map(|Extension(u)| u.id.as_str()),
        "removed record"
    );
    Ok(ApiResponse::no_content())
}
