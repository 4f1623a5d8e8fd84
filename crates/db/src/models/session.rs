//! Refresh-token session model.
//!
//! Only the SHA-256 hash of the opaque refresh token is stored, so a
//! database leak does not compromise active sessions.

use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
