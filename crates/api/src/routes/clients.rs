//! Route definitions for the `/clients` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// ```text
/// GET  /                 -> list (role-scoped)
/// POST /                 -> create profile
/// GET  /{id}             -> get (visible only)
/// PUT  /{id}             -> update
/// PUT  /{id}/assign-ca   -> assign or unassign a CA (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route("/{id}", get(clients::get).put(clients::update))
        .route("/{id}/assign-ca", put(clients::assign_ca))
}
