//! In-app notification model. Delivery channels (email/SMS) are external
//! collaborators; only the in-app record is stored here.

use serde::Serialize;
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
