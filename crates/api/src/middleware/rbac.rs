//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level. Resource-level scoping (owner/assignee)
//! is a separate concern handled via `taxdesk_core::access`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taxdesk_core::error::CoreError;
use taxdesk_core::roles::{ROLE_ADMIN, ROLE_CA};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `ca` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn ca_or_admin(RequireCa(user): RequireCa) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCa(pub AuthUser);

impl FromRequestParts<AppState> for RequireCa {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_CA {
            return Err(AppError::Core(CoreError::Forbidden(
                "CA or Admin role required".into(),
            )));
        }
        Ok(RequireCa(user))
    }
}
