// handlers/resource/mod.rs - Generic resource handlers
//
// One set of handlers serves every resource kind; the resource type
// parameter selects the descriptor, the collection and the messages.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub mod create; // POST   /api/:resource
pub mod find; //   GET    /api/:resource[?key=value], GET /api/:resource/:id
pub mod remove; // DELETE /api/:resource/:id
pub mod update; // PATCH|PUT /api/:resource/:id

pub use create::create;
pub use find::{find, show};
pub use remove::remove;
pub use update::update;

/// Request body as a JSON object. Non-object bodies carry no fields.
pub(crate) fn candidate(payload: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Ok(Map::new()),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}
