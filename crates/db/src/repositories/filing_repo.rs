//! Repository for the `filings` table.

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::filing::Filing;

/// Column list for `filings` queries.
const COLUMNS: &str = "id, client_id, ca_id, assessment_year, status, created_at, updated_at";

/// Provides data access for tax filings.
pub struct FilingRepo;

impl FilingRepo {
    /// Insert a new filing in `draft` status.
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        ca_id: Option<DbId>,
        assessment_year: &str,
    ) -> Result<Filing, sqlx::Error> {
        let query = format!(
            "INSERT INTO filings (client_id, ca_id, assessment_year) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Filing>(&query)
            .bind(client_id)
            .bind(ca_id)
            .bind(assessment_year)
            .fetch_one(pool)
            .await
    }

    /// Find a filing by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Filing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM filings WHERE id = $1");
        sqlx::query_as::<_, Filing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a filing to a new (already validated) status.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Filing>, sqlx::Error> {
        let query = format!(
            "UPDATE filings SET status = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Filing>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Filings whose owning client belongs to `user_id`.
    pub async fn list_for_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<Filing>, sqlx::Error> {
        let query = format!(
            "SELECT f.{cols} FROM filings f \
             JOIN clients c ON c.id = f.client_id \
             WHERE c.user_id = $1 \
             ORDER BY f.created_at DESC",
            cols = COLUMNS.replace(", ", ", f."),
        );
        sqlx::query_as::<_, Filing>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Filings assigned to one CA.
    pub async fn list_for_ca(pool: &PgPool, ca_id: DbId) -> Result<Vec<Filing>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM filings WHERE ca_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Filing>(&query)
            .bind(ca_id)
            .fetch_all(pool)
            .await
    }

    /// All filings (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Filing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM filings ORDER BY created_at DESC");
        sqlx::query_as::<_, Filing>(&query).fetch_all(pool).await
    }
}
