use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a document store. None of these are domain outcomes:
/// a missing document is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique key '{0}' is already in use")]
    Conflict(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Malformed document {id}: {source}")]
    Malformed {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Where documents of one resource kind live and which body field must
/// stay unique among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub name: &'static str,
    pub unique_key: &'static str,
}

/// A stored document: generated identity plus a JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-document selector.
#[derive(Debug, Clone, Copy)]
pub enum Filter<'a> {
    Id(Uuid),
    Field(&'a str, &'a str),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &Collection, filter: Filter<'_>) -> Result<Option<Document>, StoreError>;

    /// All documents of the collection, oldest first.
    async fn find_all(&self, collection: &Collection) -> Result<Vec<Document>, StoreError>;

    /// Persist a new document. `Ok(None)` means the store accepted the call
    /// but wrote nothing.
    async fn insert(&self, collection: &Collection, body: Map<String, Value>) -> Result<Option<Document>, StoreError>;

    /// Shallow-merge `patch` into the body and return the refreshed
    /// document, or `Ok(None)` if no document was updated.
    async fn update(&self, collection: &Collection, id: Uuid, patch: Map<String, Value>) -> Result<Option<Document>, StoreError>;

    /// Returns whether a document was deleted.
    async fn delete(&self, collection: &Collection, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Storage identifiers are UUIDs; anything else is not a well-formed id.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
