//! Repository for the `tax_slabs` table (admin-managed).

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::settings::{CreateTaxSlab, TaxSlab};

/// Column list for `tax_slabs` queries.
const COLUMNS: &str =
    "id, regime, slab_from_paise, slab_to_paise, rate_percent, assessment_year, created_at";

/// Provides data access for tax slabs.
pub struct TaxSlabRepo;

impl TaxSlabRepo {
    /// Insert a new slab.
    pub async fn create(pool: &PgPool, input: &CreateTaxSlab) -> Result<TaxSlab, sqlx::Error> {
        let query = format!(
            "INSERT INTO tax_slabs (regime, slab_from_paise, slab_to_paise, rate_percent, assessment_year) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxSlab>(&query)
            .bind(&input.regime)
            .bind(input.slab_from_paise)
            .bind(input.slab_to_paise)
            .bind(input.rate_percent)
            .bind(&input.assessment_year)
            .fetch_one(pool)
            .await
    }

    /// Find a slab by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaxSlab>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tax_slabs WHERE id = $1");
        sqlx::query_as::<_, TaxSlab>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Slabs for one assessment year, ordered by regime then lower bound.
    pub async fn list_for_year(
        pool: &PgPool,
        assessment_year: &str,
    ) -> Result<Vec<TaxSlab>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tax_slabs \
             WHERE assessment_year = $1 \
             ORDER BY regime, slab_from_paise"
        );
        sqlx::query_as::<_, TaxSlab>(&query)
            .bind(assessment_year)
            .fetch_all(pool)
            .await
    }

    /// All slabs.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TaxSlab>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tax_slabs ORDER BY assessment_year DESC, regime, slab_from_paise"
        );
        sqlx::query_as::<_, TaxSlab>(&query).fetch_all(pool).await
    }

    /// Delete a slab. Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tax_slabs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
