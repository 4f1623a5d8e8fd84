//! Handlers for the `/filings` resource.
//!
//! A filing tracks one assessment year for one client through the
//! draft -> in_review -> filed/rejected lifecycle. Visibility follows the
//! owning client; status transitions are validated in core and restricted
//! by role (reviewer transitions need the assigned CA or an admin).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use taxdesk_core::error::CoreError;
use taxdesk_core::filing::FilingStatus;
use taxdesk_core::roles::{ROLE_ADMIN, ROLE_CA};
use taxdesk_core::types::DbId;
use taxdesk_db::models::filing::{CreateFiling, Filing};
use taxdesk_db::repositories::{ClientRepo, FilingRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_visible;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PUT /filings/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateFilingRequest {
    pub status: String,
}

/// Fetch a filing and enforce visibility via its owning client.
pub(crate) async fn fetch_visible(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Filing> {
    let filing = FilingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Filing",
                id,
            })
        })?;

    let client = ClientRepo::find_by_id(&state.pool, filing.client_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Filing",
                id,
            })
        })?;

    ensure_visible(auth, Some(client.user_id), filing.ca_id, "Filing", id)?;
    Ok(filing)
}

/// GET /api/v1/filings
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let filings = if auth.role == ROLE_ADMIN {
        FilingRepo::list_all(&state.pool).await?
    } else if auth.role == ROLE_CA {
        FilingRepo::list_for_ca(&state.pool, auth.user_id).await?
    } else {
        FilingRepo::list_for_owner(&state.pool, auth.user_id).await?
    };
    Ok(Json(ApiResponse::ok("OK", filings)))
}

/// POST /api/v1/filings
///
/// Create a draft filing for a visible client. The client's CA assignment
/// is copied onto the filing.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateFiling>,
) -> AppResult<impl IntoResponse> {
    if input.assessment_year.trim().is_empty() {
        return Err(AppError::Core(CoreError::validation(
            "Assessment year must not be empty",
        )));
    }

    let client = ClientRepo::find_by_id(&state.pool, input.client_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Client",
                id: input.client_id,
            })
        })?;
    ensure_visible(
        &auth,
        Some(client.user_id),
        client.ca_id,
        "Client",
        client.id,
    )?;

    let filing = FilingRepo::create(
        &state.pool,
        client.id,
        client.ca_id,
        input.assessment_year.trim(),
    )
    .await?;

    tracing::info!(
        filing_id = filing.id,
        client_id = client.id,
        assessment_year = %filing.assessment_year,
        "Filing created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Filing created", filing)),
    ))
}

/// GET /api/v1/filings/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let filing = fetch_visible(&state, &auth, id).await?;
    Ok(Json(ApiResponse::ok("OK", filing)))
}

/// PUT /api/v1/filings/{id}
///
/// Move a filing to a new status. Owners may submit a draft for review;
/// review outcomes (filed / rejected / re-review) require the assigned CA
/// or an admin.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFilingRequest>,
) -> AppResult<impl IntoResponse> {
    let filing = fetch_visible(&state, &auth, id).await?;

    let current = FilingStatus::from_str_db(&filing.status)?;
    let next = FilingStatus::from_str_db(&input.status)?;

    if !current.can_transition(next) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Cannot move a filing from {} to {}",
            current.as_str(),
            next.as_str()
        ))));
    }

    // Submitting for review is open to anyone who can see the filing; the
    // review verdicts are reserved for the assigned CA and admins.
    let reviewer_transition = !(current == FilingStatus::Draft && next == FilingStatus::InReview);
    if reviewer_transition {
        let is_assigned_ca = auth.role == ROLE_CA && filing.ca_id == Some(auth.user_id);
        if auth.role != ROLE_ADMIN && !is_assigned_ca {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the assigned CA or an admin can review a filing".into(),
            )));
        }
    }

    let updated = FilingRepo::update_status(&state.pool, id, next.as_str())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Filing",
                id,
            })
        })?;

    tracing::info!(
        filing_id = id,
        from = %current.as_str(),
        to = %next.as_str(),
        "Filing status updated"
    );

    Ok(Json(ApiResponse::ok("Filing updated", updated)))
}
