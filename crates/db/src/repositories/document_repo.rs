//! Repository for the `documents` table.

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::document::{CreateDocument, Document};

/// Column list for `documents` queries.
const COLUMNS: &str = "id, filing_id, uploaded_by, verified_by, doc_type, original_name, \
     file_path, file_size, mime_type, status, created_at";

/// Provides data access for filing documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Record an uploaded document in `pending` status.
    pub async fn create(
        pool: &PgPool,
        filing_id: DbId,
        uploaded_by: DbId,
        input: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents \
                (filing_id, uploaded_by, doc_type, original_name, file_path, file_size, mime_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(filing_id)
            .bind(uploaded_by)
            .bind(&input.doc_type)
            .bind(&input.original_name)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .fetch_one(pool)
            .await
    }

    /// Find a document by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents attached to one filing, most recent first.
    pub async fn list_for_filing(
        pool: &PgPool,
        filing_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents WHERE filing_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(filing_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a document verified or rejected by a reviewer.
    pub async fn set_verification(
        pool: &PgPool,
        id: DbId,
        verified_by: DbId,
        status: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET verified_by = $2, status = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(verified_by)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document record. Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
