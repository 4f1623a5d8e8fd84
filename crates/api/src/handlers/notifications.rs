//! Handlers for the `/notifications` resource (in-app records).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use taxdesk_core::error::CoreError;
use taxdesk_core::types::DbId;
use taxdesk_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/notifications
///
/// The authenticated user's notifications, most recent first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(25).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(ApiResponse::ok("OK", notifications)))
}

/// PUT /api/v1/notifications/{id}/read
///
/// Mark one of the user's own notifications as read. Another user's
/// notification id reads as not found.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let notification = NotificationRepo::mark_read(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;

    Ok(Json(ApiResponse::ok("Notification marked read", notification)))
}
