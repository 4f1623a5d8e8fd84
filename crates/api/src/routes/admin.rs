//! Route definitions for the `/admin` resource group.
//!
//! Every handler here checks the admin role via the `RequireAdmin`
//! extractor, so a non-admin gets 403 regardless of the path.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                      -> list users (paginated)
/// PUT    /users/{id}/role            -> change a user's role
/// POST   /users/{id}/deactivate      -> deactivate account
/// POST   /users/{id}/activate        -> reactivate account
///
/// GET    /pricing-plans              -> list all plans (incl. inactive)
/// POST   /pricing-plans              -> create plan
/// PUT    /pricing-plans/{id}         -> update plan
/// DELETE /pricing-plans/{id}         -> delete plan
///
/// GET    /tax-slabs                  -> list slabs (?assessmentYear=)
/// POST   /tax-slabs                  -> create slab
/// DELETE /tax-slabs/{id}             -> delete slab
///
/// GET    /notification-defaults      -> platform notification defaults
/// PUT    /notification-defaults      -> update defaults
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(settings::list_users))
        .route("/users/{id}/role", put(settings::update_user_role))
        .route("/users/{id}/deactivate", post(settings::deactivate_user))
        .route("/users/{id}/activate", post(settings::activate_user))
        .route(
            "/pricing-plans",
            get(settings::list_plans).post(settings::create_plan),
        )
        .route(
            "/pricing-plans/{id}",
            put(settings::update_plan).delete(settings::delete_plan),
        )
        .route(
            "/tax-slabs",
            get(settings::list_slabs).post(settings::create_slab),
        )
        .route("/tax-slabs/{id}", delete(settings::delete_slab))
        .route(
            "/notification-defaults",
            get(settings::get_notification_defaults).put(settings::update_notification_defaults),
        )
}
