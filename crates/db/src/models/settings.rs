//! Admin-managed settings models: pricing plans, tax slabs, and
//! notification defaults.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxdesk_core::types::{DbId, Timestamp};

/// A row from the `pricing_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub price_paise: i64,
    pub features: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a pricing plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePricingPlan {
    pub name: String,
    pub description: String,
    pub price_paise: i64,
    pub features: Option<serde_json::Value>,
}

/// DTO for updating a pricing plan. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricingPlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_paise: Option<i64>,
    pub features: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

/// A row from the `tax_slabs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlab {
    pub id: DbId,
    /// `old` or `new` regime.
    pub regime: String,
    pub slab_from_paise: i64,
    /// Open-ended slab when absent.
    pub slab_to_paise: Option<i64>,
    pub rate_percent: f64,
    pub assessment_year: String,
    pub created_at: Timestamp,
}

/// DTO for creating a tax slab.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaxSlab {
    pub regime: String,
    pub slab_from_paise: i64,
    pub slab_to_paise: Option<i64>,
    pub rate_percent: f64,
    pub assessment_year: String,
}

/// The singleton `notification_defaults` row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDefaults {
    pub id: DbId,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    /// Days before a filing deadline to remind clients.
    pub reminder_days: i32,
    pub updated_at: Timestamp,
}

/// DTO for updating notification defaults. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationDefaults {
    pub email_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub reminder_days: Option<i32>,
}
