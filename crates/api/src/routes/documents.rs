//! Route definitions for the `/documents` resource.
//!
//! Listing and creation live under `/filings/{id}/documents`; this router
//! covers operations addressed by document id.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// POST   /{id}/verify  -> verify or reject (assigned CA / admin)
/// DELETE /{id}         -> delete record (uploader / admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/verify", post(documents::verify))
        .route("/{id}", delete(documents::delete))
}
