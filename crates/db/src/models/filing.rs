//! Filing entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `filings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filing {
    pub id: DbId,
    pub client_id: DbId,
    /// CA assigned to this filing (copied from the client at creation).
    pub ca_id: Option<DbId>,
    /// e.g. `"2025-26"`.
    pub assessment_year: String,
    /// One of the `taxdesk_core::filing::FilingStatus` strings.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a filing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFiling {
    pub client_id: DbId,
    pub assessment_year: String,
}
