//! Process-local document store for development and tests

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Collection, Document, DocumentStore, Filter, StoreError};

/// In-memory document store. Documents are kept per collection in
/// insertion order; the unique key is enforced under the write lock.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<&'static str, Vec<Document>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn field_matches(document: &Document, key: &str, value: &str) -> bool {
    document.body.get(key).and_then(Value::as_str) == Some(value)
}

fn key_taken(documents: &[Document], key: &str, body: &Map<String, Value>, except: Option<Uuid>) -> bool {
    let Some(value) = body.get(key).and_then(Value::as_str) else {
        return false;
    };
    documents
        .iter()
        .any(|d| Some(d.id) != except && field_matches(d, key, value))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_one(&self, collection: &Collection, filter: Filter<'_>) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection.name) else {
            return Ok(None);
        };

        let found = documents.iter().find(|d| match filter {
            Filter::Id(id) => d.id == id,
            Filter::Field(key, value) => field_matches(d, key, value),
        });
        Ok(found.cloned())
    }

    async fn find_all(&self, collection: &Collection) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection.name).cloned().unwrap_or_default())
    }

    async fn insert(&self, collection: &Collection, body: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.name).or_default();

        if key_taken(documents, collection.unique_key, &body, None) {
            return Err(StoreError::Conflict(collection.unique_key.to_string()));
        }

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            body,
            created_at: now,
            updated_at: now,
        };
        documents.push(document.clone());
        Ok(Some(document))
    }

    async fn update(&self, collection: &Collection, id: Uuid, patch: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection.name) else {
            return Ok(None);
        };

        if key_taken(documents, collection.unique_key, &patch, Some(id)) {
            return Err(StoreError::Conflict(collection.unique_key.to_string()));
        }

        let Some(document) = documents.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        document.body.extend(patch);
        document.updated_at = Utc::now();
        Ok(Some(document.clone()))
    }

    async fn delete(&self, collection: &Collection, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection.name) else {
            return Ok(false);
        };

        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
