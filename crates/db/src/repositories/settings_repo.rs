//! Repository for the singleton `notification_defaults` row.

use sqlx::PgPool;

use crate::models::settings::{NotificationDefaults, UpdateNotificationDefaults};

/// Column list for `notification_defaults` queries.
const COLUMNS: &str = "id, email_enabled, sms_enabled, reminder_days, updated_at";

/// The singleton row id.
const SINGLETON_ID: i64 = 1;

/// Provides data access for platform-wide notification defaults.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the defaults row, materializing it on first access.
    pub async fn get_or_create(pool: &PgPool) -> Result<NotificationDefaults, sqlx::Error> {
        sqlx::query(
            "INSERT INTO notification_defaults (id) VALUES ($1) ON CONFLICT (id) DO NOTHING",
        )
        .bind(SINGLETON_ID)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM notification_defaults WHERE id = $1");
        sqlx::query_as::<_, NotificationDefaults>(&query)
            .bind(SINGLETON_ID)
            .fetch_one(pool)
            .await
    }

    /// Partially update the defaults row.
    pub async fn update(
        pool: &PgPool,
        input: &UpdateNotificationDefaults,
    ) -> Result<NotificationDefaults, sqlx::Error> {
        // Ensure the row exists before updating.
        Self::get_or_create(pool).await?;

        let query = format!(
            "UPDATE notification_defaults SET \
                email_enabled = COALESCE($2, email_enabled), \
                sms_enabled = COALESCE($3, sms_enabled), \
                reminder_days = COALESCE($4, reminder_days), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationDefaults>(&query)
            .bind(SINGLETON_ID)
            .bind(input.email_enabled)
            .bind(input.sms_enabled)
            .bind(input.reminder_days)
            .fetch_one(pool)
            .await
    }
}
