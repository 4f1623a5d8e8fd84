//! Route definitions for the `/onboarding` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at `/onboarding`. All require auth; the wizard state is
/// keyed by the authenticated user.
///
/// ```text
/// GET    /            -> progress + saved steps (?step= narrows to one step
///                        with its file records)
/// POST   /            -> save step data, optionally marking it complete
/// PUT    /            -> apply a progress action (navigate, payment, reset)
/// DELETE /            -> hard reset (?step= resets one step's data)
/// GET    /config      -> step configuration (+ ?step= for one step)
/// GET    /progress    -> completion summary
/// GET    /next-step   -> first incomplete step
/// GET    /files       -> files recorded for one step (?step= required)
/// POST   /files       -> record an uploaded file against a step
/// DELETE /files/{id}  -> remove a file record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(onboarding::get_onboarding)
                .post(onboarding::save_step)
                .put(onboarding::apply_action)
                .delete(onboarding::reset),
        )
        .route("/config", get(onboarding::get_config))
        .route("/progress", get(onboarding::get_progress))
        .route("/next-step", get(onboarding::next_step))
        .route(
            "/files",
            get(onboarding::list_files).post(onboarding::record_file),
        )
        .route("/files/{id}", delete(onboarding::delete_file))
}
