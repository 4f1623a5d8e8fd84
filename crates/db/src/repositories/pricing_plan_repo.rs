//! Repository for the `pricing_plans` table (admin-managed).

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::settings::{CreatePricingPlan, PricingPlan, UpdatePricingPlan};

/// Column list for `pricing_plans` queries.
const COLUMNS: &str =
    "id, name, description, price_paise, features, is_active, created_at, updated_at";

/// Provides data access for pricing plans.
pub struct PricingPlanRepo;

impl PricingPlanRepo {
    /// Insert a new plan.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePricingPlan,
    ) -> Result<PricingPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO pricing_plans (name, description, price_paise, features) \
             VALUES ($1, $2, $3, COALESCE($4, '[]'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PricingPlan>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_paise)
            .bind(&input.features)
            .fetch_one(pool)
            .await
    }

    /// Find a plan by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PricingPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pricing_plans WHERE id = $1");
        sqlx::query_as::<_, PricingPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List plans, optionally restricted to active ones.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<PricingPlan>, sqlx::Error> {
        let query = if active_only {
            format!(
                "SELECT {COLUMNS} FROM pricing_plans WHERE is_active = true ORDER BY price_paise"
            )
        } else {
            format!("SELECT {COLUMNS} FROM pricing_plans ORDER BY price_paise")
        };
        sqlx::query_as::<_, PricingPlan>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a plan's editable fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePricingPlan,
    ) -> Result<Option<PricingPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE pricing_plans SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                price_paise = COALESCE($4, price_paise), \
                features = COALESCE($5, features), \
                is_active = COALESCE($6, is_active), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PricingPlan>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_paise)
            .bind(&input.features)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a plan. Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pricing_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
