//! Uniform response envelope for all API handlers.
//!
//! Every response, success or failure, serializes as
//! `{ success, message, data?, timestamp, errors? }`. Use [`ApiResponse`]
//! instead of ad-hoc `serde_json::json!` to get compile-time type safety
//! and consistent serialization.

use serde::Serialize;
use taxdesk_core::types::Timestamp;

/// Standard response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: Timestamp,
    /// Field-level messages accompanying a validation failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
            errors: None,
        }
    }

    /// Failure envelope. `errors` carries per-field validation messages.
    pub fn error(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
            errors,
        }
    }
}
