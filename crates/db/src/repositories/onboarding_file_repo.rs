//! Repository for the `onboarding_files` table.
//!
//! Records metadata only; the byte transfer and physical deletion belong to
//! the storage layer.

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::onboarding::{CreateOnboardingFile, OnboardingFile};

/// Column list for `onboarding_files` queries.
const COLUMNS: &str = "id, user_id, step, file_type, original_name, file_path, \
     file_size, mime_type, metadata, uploaded_at";

/// Provides data access for onboarding file metadata.
pub struct OnboardingFileRepo;

impl OnboardingFileRepo {
    /// Record a file after a successful upload hand-off.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateOnboardingFile,
    ) -> Result<OnboardingFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding_files \
                (user_id, step, file_type, original_name, file_path, file_size, mime_type, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingFile>(&query)
            .bind(user_id)
            .bind(input.step)
            .bind(&input.file_type)
            .bind(&input.original_name)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Files recorded for one step, most recent first.
    pub async fn list_for_step(
        pool: &PgPool,
        user_id: DbId,
        step: i32,
    ) -> Result<Vec<OnboardingFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_files \
             WHERE user_id = $1 AND step = $2 \
             ORDER BY uploaded_at DESC"
        );
        sqlx::query_as::<_, OnboardingFile>(&query)
            .bind(user_id)
            .bind(step)
            .fetch_all(pool)
            .await
    }

    /// Number of files already recorded for one step.
    pub async fn count_for_step(
        pool: &PgPool,
        user_id: DbId,
        step: i32,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM onboarding_files WHERE user_id = $1 AND step = $2",
        )
        .bind(user_id)
        .bind(step)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Delete one file record scoped to its owner. Returns the number of
    /// rows deleted (0 when the file does not exist or belongs to someone
    /// else).
    pub async fn delete(pool: &PgPool, user_id: DbId, file_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM onboarding_files WHERE id = $1 AND user_id = $2")
            .bind(file_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
