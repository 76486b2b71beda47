use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{EducationArea, ExhibitionRoom, Recommendation};
use crate::database::Resource;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let route = |r: &str| format!("/api/{}[/:id]", r);

    Json(json!({
        "success": true,
        "data": {
            "name": "Museum Content API",
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "education_areas": route(EducationArea::DESCRIPTOR.route),
                "recommendations": route(Recommendation::DESCRIPTOR.route),
                "exhibition_rooms": route(ExhibitionRoom::DESCRIPTOR.route),
            },
            "auth": "Mutations require 'Authorization: Bearer <token>' (exhibition room creation is public)"
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
