use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::document::{Collection, RawDocument, Revision};
use crate::error::{DocStoreError, Result};
use crate::store::{DocumentStore, PutOptions};

/// PostgreSQL-backed document store implementation.
///
/// Documents live in a single `documents` table, one JSONB row per
/// document, keyed by (collection, id).
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_document(row: PgRow) -> Result<RawDocument> {
        Ok(RawDocument {
            id: row.try_get("id")?,
            rev: Revision::new(row.try_get("rev")?),
            body: row.try_get("body")?,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>> {
        let row = sqlx::query(
            r#"
            SELECT id, rev, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<Vec<RawDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT id, rev, body
            FROM documents
            WHERE collection = $1 AND id = ANY($2)
            ORDER BY id ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT id, rev, body
            FROM documents
            WHERE collection = $1 AND body->>$2 = $3
            ORDER BY id ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn list(&self, collection: Collection) -> Result<Vec<RawDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT id, rev, body
            FROM documents
            WHERE collection = $1
            ORDER BY id ASC
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn put(
        &self,
        collection: Collection,
        id: &str,
        body: serde_json::Value,
        options: PutOptions,
    ) -> Result<Revision> {
        // Lock the row so concurrent writers serialize on the revision check
        let mut tx = self.pool.begin().await?;

        let current: Option<i64> = sqlx::query_scalar(
            "SELECT rev FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let actual = Revision::new(current.unwrap_or(0));

        // Check expected revision if specified
        if let Some(expected) = options.expected_rev
            && actual != expected
        {
            return Err(DocStoreError::RevisionConflict {
                id: id.to_string(),
                expected,
                actual,
            });
        }

        let rev = actual.next();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, rev, body, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (collection, id) DO UPDATE SET
                rev = EXCLUDED.rev,
                body = EXCLUDED.body,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(rev.as_i64())
        .bind(&body)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rev)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DocStoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
