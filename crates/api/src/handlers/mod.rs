//! HTTP handlers, one module per resource.

pub mod auth;
pub mod clients;
pub mod documents;
pub mod filings;
pub mod notifications;
pub mod onboarding;
pub mod payments;
pub mod settings;

use taxdesk_core::access::authorize;
use taxdesk_core::error::CoreError;
use taxdesk_core::types::DbId;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Enforce resource scoping, hiding existence from out-of-scope actors.
///
/// A denial surfaces as 404 rather than 403 so unauthorized callers cannot
/// probe which ids exist. Role-gated route groups (admin) return 403 via the
/// RBAC extractors instead, since the route itself reveals nothing.
pub(crate) fn ensure_visible(
    actor: &AuthUser,
    owner_id: Option<DbId>,
    assignee_id: Option<DbId>,
    entity: &'static str,
    id: DbId,
) -> Result<(), AppError> {
    authorize(actor.user_id, &actor.role, owner_id, assignee_id)
        .map_err(|_| AppError::Core(CoreError::NotFound { entity, id }))
}
