use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::store::{Collection, Document, DocumentStore, Filter, StoreError};

const UNIQUE_VIOLATION: &str = "23505";

const COLUMNS: &str = "id, body, created_at, updated_at";

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            body: row.body.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Document store over a single Postgres table with a JSONB body column
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique index violations become `Conflict`; everything else passes through.
fn translate(err: sqlx::Error, collection: &Collection) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict(collection.unique_key.to_string());
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_one(&self, collection: &Collection, filter: Filter<'_>) -> Result<Option<Document>, StoreError> {
        let row = match filter {
            Filter::Id(id) => {
                let sql = format!("SELECT {COLUMNS} FROM documents WHERE collection = $1 AND id = $2");
                sqlx::query_as::<_, DocumentRow>(&sql)
                    .bind(collection.name)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Filter::Field(key, value) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND body ->> $2 = $3 LIMIT 1"
                );
                sqlx::query_as::<_, DocumentRow>(&sql)
                    .bind(collection.name)
                    .bind(key)
                    .bind(value)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(row.map(Document::from))
    }

    async fn find_all(&self, collection: &Collection) -> Result<Vec<Document>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM documents WHERE collection = $1 ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection.name)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn insert(&self, collection: &Collection, body: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(collection.name)
            .bind(Json(&body))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, collection))?;

        Ok(row.map(Document::from))
    }

    async fn update(&self, collection: &Collection, id: Uuid, patch: Map<String, Value>) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "UPDATE documents SET body = body || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection.name)
            .bind(id)
            .bind(Json(&patch))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, collection))?;

        Ok(row.map(Document::from))
    }

    async fn delete(&self, collection: &Collection, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
