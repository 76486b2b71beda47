use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::store::{Collection, StoreError};

/// Connection and schema bootstrap for the Postgres document table
pub struct DatabaseManager;

impl DatabaseManager {
    /// Name of the single table holding every collection's documents.
    pub const DOCUMENTS_TABLE: &'static str = "documents";

    /// Open a pool against `DATABASE_URL`
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Create the documents table and one partial unique index per collection
    pub async fn ensure_schema(pool: &PgPool, collections: &[Collection]) -> Result<(), StoreError> {
        let table = Self::quote_identifier(Self::DOCUMENTS_TABLE);
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                collection TEXT NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
        );
        sqlx::query(&create_table).execute(pool).await?;

        let create_lookup = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {table} (collection, created_at)",
            Self::quote_identifier("documents_collection_idx"),
        );
        sqlx::query(&create_lookup).execute(pool).await?;

        for collection in collections {
            sqlx::query(&Self::unique_index_sql(collection)).execute(pool).await?;
            info!(
                "Ensured unique index on {}.{}",
                collection.name, collection.unique_key
            );
        }

        Ok(())
    }

    fn unique_index_sql(collection: &Collection) -> String {
        let index_name = format!("{}_{}_key", collection.name, collection.unique_key.to_lowercase());
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ((body ->> {})) WHERE collection = {}",
            Self::quote_identifier(&index_name),
            Self::quote_identifier(Self::DOCUMENTS_TABLE),
            Self::quote_literal(collection.unique_key),
            Self::quote_literal(collection.name),
        )
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn quote_literal(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}
