//! Route definitions for the `/filings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{documents, filings};
use crate::state::AppState;

/// Routes mounted at `/filings`.
///
/// ```text
/// GET  /                 -> list (role-scoped)
/// POST /                 -> create draft filing
/// GET  /{id}             -> get (visible only)
/// PUT  /{id}             -> status transition
/// GET  /{id}/documents   -> list document records
/// POST /{id}/documents   -> record an uploaded document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(filings::list).post(filings::create))
        .route("/{id}", get(filings::get).put(filings::update_status))
        .route(
            "/{id}/documents",
            get(documents::list_for_filing).post(documents::create),
        )
}
