use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::store::{Collection, Document, StoreError};

/// Static description of one resource kind: where it is stored, which
/// fields it accepts, and the messages its outcomes carry.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub collection: Collection,
    /// Path segment under `/api`
    pub route: &'static str,
    pub fields: &'static [&'static str],
    pub required: &'static [&'static str],
    pub duplicate_message: &'static str,
    pub not_found_message: &'static str,
    pub not_saved_message: &'static str,
    pub none_found_message: &'static str,
}

impl Descriptor {
    pub fn unique_key(&self) -> &'static str {
        self.collection.unique_key
    }

    pub fn recognizes(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// A resource body as stored in a document. Implementors are plain serde
/// structs; the descriptor drives validation and lookups.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const DESCRIPTOR: Descriptor;

    /// Type-check a JSON object against this resource's shape.
    fn from_fields(fields: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(fields.clone()))
    }
}

/// A persisted resource: identity and timestamps around the typed body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<R> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: R,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<R: Resource> Record<R> {
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        let fields = R::from_fields(&document.body).map_err(|source| StoreError::Malformed {
            id: document.id,
            source,
        })?;

        Ok(Self {
            id: document.id,
            fields,
            created_at: document.created_at,
            updated_at: document.updated_at,
        })
    }
}
