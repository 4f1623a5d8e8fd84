//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET  /          -> list (role-scoped)
/// POST /          -> record a gateway order
/// GET  /{id}      -> get (visible only)
/// POST /verify    -> checkout callback signature verification
/// POST /webhook   -> gateway webhook (public, signature-authenticated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payments::list).post(payments::create))
        .route("/verify", post(payments::verify))
        .route("/webhook", post(payments::webhook))
        .route("/{id}", get(payments::get))
}
