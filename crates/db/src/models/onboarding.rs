//! Onboarding progress, step record, and file record models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `onboarding_progress` table (one per user, created
/// lazily on first access).
///
/// Invariant maintained by the repository: `is_completed` is true exactly
/// when `completed_steps` contains all seven steps.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    pub user_id: DbId,
    pub current_step: i32,
    /// Distinct step numbers, kept sorted by the repository.
    pub completed_steps: Vec<i32>,
    /// One of the `taxdesk_core::onboarding::PaymentStatus` strings.
    pub payment_status: String,
    pub is_completed: bool,
    pub last_updated: Timestamp,
}

/// A row from the `onboarding_steps` table (unique per user and step).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStepRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub step: i32,
    pub step_name: String,
    pub data: serde_json::Value,
    /// Set when the step was explicitly marked complete.
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `onboarding_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingFile {
    pub id: DbId,
    pub user_id: DbId,
    pub step: i32,
    pub file_type: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub metadata: serde_json::Value,
    pub uploaded_at: Timestamp,
}

/// DTO for recording file metadata after a successful upload hand-off.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOnboardingFile {
    pub step: i32,
    pub file_type: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub metadata: Option<serde_json::Value>,
}
