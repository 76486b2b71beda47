//! Store doubles and helpers shared by unit tests

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::store::{Collection, Document, DocumentStore, Filter, StoreError};
use crate::database::InMemoryStore;

/// Unwrap a JSON object literal
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Reads succeed against seeded documents; every write is accepted but
/// reports nothing written.
#[derive(Clone, Default)]
pub struct RejectingStore {
    inner: InMemoryStore,
}

impl RejectingStore {
    pub async fn seed(&self, collection: &Collection, body: Value) -> Document {
        self.inner
            .insert(collection, object(body))
            .await
            .expect("seed insert")
            .expect("seed document")
    }
}

#[async_trait]
impl DocumentStore for RejectingStore {
    async fn find_one(&self, collection: &Collection, filter: Filter<'_>) -> Result<Option<Document>, StoreError> {
        self.inner.find_one(collection, filter).await
    }

    async fn find_all(&self, collection: &Collection) -> Result<Vec<Document>, StoreError> {
        self.inner.find_all(collection).await
    }

    async fn insert(&self, _collection: &Collection, _body: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }

    async fn update(&self, _collection: &Collection, _id: Uuid, _patch: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _collection: &Collection, _id: Uuid) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Every call fails as if the database were unreachable.
#[derive(Clone, Copy, Default)]
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn find_one(&self, _collection: &Collection, _filter: Filter<'_>) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn find_all(&self, _collection: &Collection) -> Result<Vec<Document>, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _collection: &Collection, _body: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn update(&self, _collection: &Collection, _id: Uuid, _patch: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _collection: &Collection, _id: Uuid) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
