//! Payment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: DbId,
    pub client_id: DbId,
    pub filing_id: Option<DbId>,
    /// Amount in the smallest currency unit (paise for INR).
    pub amount_paise: i64,
    pub currency: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    /// `created`, `captured`, or `failed`.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a newly created gateway order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub client_id: DbId,
    pub filing_id: Option<DbId>,
    pub amount_paise: i64,
    pub currency: Option<String>,
    pub razorpay_order_id: String,
}
