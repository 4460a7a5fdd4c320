use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{document_id, Document, DocumentStore, Filter, Sort, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq         BIGSERIAL,
    collection  TEXT  NOT NULL,
    id          TEXT  NOT NULL,
    body        JSONB NOT NULL,
    PRIMARY KEY (collection, id)
)
"#;

const CREATE_SEQ_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS documents_collection_seq ON documents (collection, seq)";

/// Document store backed by a single PostgreSQL JSONB table.
///
/// Every collection shares the `documents` table. Filters use JSONB
/// containment (`@>`), so an empty filter matches everything, and updates
/// merge with `||`, which replaces only the top-level keys present in the
/// update.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the `documents` table if needed.
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_SEQ_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

fn classify_insert_error(err: sqlx::Error, collection: &str, id: &str) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        // unique_violation
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::DuplicateKey {
                collection: collection.to_owned(),
                id: id.to_owned(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        let id = document_id(collection, &doc)?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await
            .map_err(|e| classify_insert_error(e, collection, &id))?;

        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents
             WHERE collection = $1 AND body @> $2
             ORDER BY seq
             LIMIT 1",
        )
        .bind(collection)
        .bind(Json(filter.as_document()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = match sort {
            Some(sort) => {
                let direction = if sort.descending { "DESC" } else { "ASC" };
                let sql = format!(
                    "SELECT body FROM documents
                     WHERE collection = $1 AND body @> $2
                     ORDER BY (body ->> $3)::timestamptz {direction}, seq {direction}
                     LIMIT $4"
                );
                sqlx::query_scalar::<_, Json<Document>>(&sql)
                    .bind(collection)
                    .bind(Json(filter.as_document()))
                    .bind(sort.field)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, Json<Document>>(
                    "SELECT body FROM documents
                     WHERE collection = $1 AND body @> $2
                     ORDER BY seq
                     LIMIT $3",
                )
                .bind(collection)
                .bind(Json(filter.as_document()))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3
             WHERE collection = $1 AND id = (
                 SELECT id FROM documents
                 WHERE collection = $1 AND body @> $2
                 ORDER BY seq
                 LIMIT 1
             )",
        )
        .bind(collection)
        .bind(Json(filter.as_document()))
        .bind(Json(&set))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM documents
             WHERE collection = $1 AND id = (
                 SELECT id FROM documents
                 WHERE collection = $1 AND body @> $2
                 ORDER BY seq
                 LIMIT 1
             )",
        )
        .bind(collection)
        .bind(Json(filter.as_document()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("🔌 Document store connection closed");
    }
}
