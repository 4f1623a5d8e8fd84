//! Repository for the `onboarding_progress` and `onboarding_steps` tables.
//!
//! Every mutation that touches both a step record and the progress row runs
//! in a single transaction with the progress row locked `FOR UPDATE`, so
//! concurrent saves for one user serialize and a step is never observable as
//! saved without its progress counterpart (or vice versa).

use sqlx::{PgConnection, PgPool};
use taxdesk_core::onboarding::{
    self, PaymentStatus, MAX_STEP, MIN_STEP,
};
use taxdesk_core::types::DbId;

use crate::models::onboarding::{OnboardingProgress, OnboardingStepRecord};

/// Column list for `onboarding_progress` queries.
const PROGRESS_COLUMNS: &str =
    "user_id, current_step, completed_steps, payment_status, is_completed, last_updated";

/// Column list for `onboarding_steps` queries.
const STEP_COLUMNS: &str =
    "id, user_id, step, step_name, data, completed_at, created_at, updated_at";

/// Provides data access for per-user onboarding state.
pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Fetch the progress row for a user, materializing the default state
    /// (step 1, empty completed set, pending payment) on first access.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        sqlx::query(
            "INSERT INTO onboarding_progress (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {PROGRESS_COLUMNS} FROM onboarding_progress WHERE user_id = $1");
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Upsert one step's data and update the progress row atomically.
    ///
    /// The gating rule is evaluated against the `FOR UPDATE`-locked progress
    /// row inside the transaction; an unreachable step rolls back and returns
    /// `None`, so a concurrent reset between a caller's read and this write
    /// cannot let a step save past a retracted prefix.
    ///
    /// When `mark_completed` is set the step joins the completed set and
    /// `completed_at` is stamped (first completion wins). `current_step`
    /// advances if the saved step is ahead of it.
    pub async fn save_step(
        pool: &PgPool,
        user_id: DbId,
        step: i32,
        step_name: &str,
        data: &serde_json::Value,
        mark_completed: bool,
    ) -> Result<Option<(OnboardingStepRecord, OnboardingProgress)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let progress = Self::lock_progress(&mut tx, user_id).await?;
        if !onboarding::can_access_step(&progress.completed_steps, step) {
            tx.rollback().await?;
            return Ok(None);
        }

        let upsert = format!(
            "INSERT INTO onboarding_steps (user_id, step, step_name, data, completed_at) \
             VALUES ($1, $2, $3, $4, CASE WHEN $5 THEN now() END) \
             ON CONFLICT (user_id, step) DO UPDATE SET \
                step_name = EXCLUDED.step_name, \
                data = EXCLUDED.data, \
                completed_at = CASE \
                    WHEN $5 THEN COALESCE(onboarding_steps.completed_at, now()) \
                    ELSE onboarding_steps.completed_at END, \
                updated_at = now() \
             RETURNING {STEP_COLUMNS}"
        );
        let record = sqlx::query_as::<_, OnboardingStepRecord>(&upsert)
            .bind(user_id)
            .bind(step)
            .bind(step_name)
            .bind(data)
            .bind(mark_completed)
            .fetch_one(&mut *tx)
            .await?;

        let completed = if mark_completed {
            onboarding::with_step_added(&progress.completed_steps, step)
        } else {
            progress.completed_steps.clone()
        };
        let current_step = progress.current_step.max(step);
        let is_completed = onboarding::is_complete(&completed);

        let updated = Self::write_progress(
            &mut tx,
            user_id,
            current_step,
            &completed,
            &progress.payment_status,
            is_completed,
        )
        .await?;

        tx.commit().await?;
        Ok(Some((record, updated)))
    }

    /// Fetch one step record, if saved.
    pub async fn get_step(
        pool: &PgPool,
        user_id: DbId,
        step: i32,
    ) -> Result<Option<OnboardingStepRecord>, sqlx::Error> {
        let query =
            format!("SELECT {STEP_COLUMNS} FROM onboarding_steps WHERE user_id = $1 AND step = $2");
        sqlx::query_as::<_, OnboardingStepRecord>(&query)
            .bind(user_id)
            .bind(step)
            .fetch_optional(pool)
            .await
    }

    /// All saved step records for a user, ascending by step number.
    pub async fn list_steps(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<OnboardingStepRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM onboarding_steps WHERE user_id = $1 ORDER BY step ASC"
        );
        sqlx::query_as::<_, OnboardingStepRecord>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Move `current_step` to an (already gated) target step.
    pub async fn navigate(
        pool: &PgPool,
        user_id: DbId,
        target_step: i32,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding_progress SET current_step = $2, last_updated = now() \
             WHERE user_id = $1 \
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(user_id)
            .bind(target_step)
            .fetch_one(pool)
            .await
    }

    /// Mark the payment completed (adds step 7) or failed (retracts step 7),
    /// in its own transaction.
    pub async fn set_payment_result(
        pool: &PgPool,
        user_id: DbId,
        captured: bool,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let progress = Self::settle_payment(&mut tx, user_id, captured).await?;
        tx.commit().await?;
        Ok(progress)
    }

    /// Payment settlement inside an existing transaction. Used by this repo
    /// and by `PaymentRepo::settle_webhook` so the payment-row update and the
    /// progress update commit together.
    pub async fn settle_payment(
        conn: &mut PgConnection,
        user_id: DbId,
        captured: bool,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        let progress = Self::lock_progress(conn, user_id).await?;

        let (completed, status) = if captured {
            (
                onboarding::with_step_added(&progress.completed_steps, MAX_STEP),
                PaymentStatus::Completed,
            )
        } else {
            (
                onboarding::with_step_removed(&progress.completed_steps, MAX_STEP),
                PaymentStatus::Failed,
            )
        };
        let is_completed = onboarding::is_complete(&completed);

        Self::write_progress(
            conn,
            user_id,
            progress.current_step,
            &completed,
            status.as_str(),
            is_completed,
        )
        .await
    }

    /// Soft reset: restore the progress row to defaults. Step data and file
    /// records are deliberately untouched.
    pub async fn reset_progress(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding_progress SET \
                current_step = {MIN_STEP}, \
                completed_steps = '{{}}', \
                payment_status = 'pending', \
                is_completed = false, \
                last_updated = now() \
             WHERE user_id = $1 \
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Delete one step's record and retract it from the completed set, in a
    /// single transaction.
    pub async fn reset_step(
        pool: &PgPool,
        user_id: DbId,
        step: i32,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let progress = Self::lock_progress(&mut tx, user_id).await?;

        sqlx::query("DELETE FROM onboarding_steps WHERE user_id = $1 AND step = $2")
            .bind(user_id)
            .bind(step)
            .execute(&mut *tx)
            .await?;

        let completed = onboarding::with_step_removed(&progress.completed_steps, step);
        let is_completed = onboarding::is_complete(&completed);

        let updated = Self::write_progress(
            &mut tx,
            user_id,
            progress.current_step,
            &completed,
            &progress.payment_status,
            is_completed,
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Hard reset: delete all step records, all file records, and the
    /// progress row itself. Idempotent -- succeeds even when nothing existed.
    pub async fn reset_all(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM onboarding_steps WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM onboarding_files WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM onboarding_progress WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(user_id, "Onboarding data hard-reset");
        Ok(())
    }

    /// Materialize (if needed) and lock the progress row for update.
    async fn lock_progress(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        sqlx::query(
            "INSERT INTO onboarding_progress (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM onboarding_progress WHERE user_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(user_id)
            .fetch_one(conn)
            .await
    }

    async fn write_progress(
        conn: &mut PgConnection,
        user_id: DbId,
        current_step: i32,
        completed: &[i32],
        payment_status: &str,
        is_completed: bool,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding_progress SET \
                current_step = $2, \
                completed_steps = $3, \
                payment_status = $4, \
                is_completed = $5, \
                last_updated = now() \
             WHERE user_id = $1 \
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(user_id)
            .bind(current_step)
            .bind(completed.to_vec())
            .bind(payment_status)
            .bind(is_completed)
            .fetch_one(conn)
            .await
    }
}
