//! Client entity model and DTOs.
//!
//! A client is a tax profile owned by a `customer` user and optionally
//! assigned to a `ca` user. Ownership and assignment drive all resource
//! scoping (see `taxdesk_core::access`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: DbId,
    /// Owning user.
    pub user_id: DbId,
    /// Assigned chartered accountant, if any.
    pub ca_id: Option<DbId>,
    pub pan: String,
    pub full_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    pub pan: String,
    pub full_name: String,
    /// Admins may create a profile on behalf of another user.
    pub user_id: Option<DbId>,
}

/// DTO for updating a client profile. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    pub pan: Option<String>,
    pub full_name: Option<String>,
}
