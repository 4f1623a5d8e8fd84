//! Document entity model and DTOs.
//!
//! Only metadata is stored; the byte transfer happens before a record is
//! created and physical deletion is a storage-layer concern.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DbId,
    pub filing_id: DbId,
    pub uploaded_by: DbId,
    pub verified_by: Option<DbId>,
    pub doc_type: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    /// `pending`, `verified`, or `rejected`.
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for recording an uploaded document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocument {
    pub doc_type: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
}
