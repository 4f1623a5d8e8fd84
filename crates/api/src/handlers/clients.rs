//! Handlers for the `/clients` resource.
//!
//! A client is a tax profile owned by a customer and optionally assigned to
//! a CA. All reads and writes are scoped: customers see their own profiles,
//! CAs the ones assigned to them, admins everything.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use taxdesk_core::error::CoreError;
use taxdesk_core::roles::{ROLE_ADMIN, ROLE_CA, ROLE_CUSTOMER};
use taxdesk_core::types::DbId;
use taxdesk_db::models::client::{Client, CreateClient, UpdateClient};
use taxdesk_db::repositories::{ClientRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_visible;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PUT /clients/{id}/assign-ca`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCaRequest {
    /// `null` unassigns.
    pub ca_id: Option<DbId>,
}

/// Fetch a client and enforce visibility for the actor.
async fn fetch_visible(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Client> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Client",
                id,
            })
        })?;
    ensure_visible(auth, Some(client.user_id), client.ca_id, "Client", id)?;
    Ok(client)
}

/// GET /api/v1/clients
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let clients = if auth.role == ROLE_ADMIN {
        ClientRepo::list_all(&state.pool).await?
    } else if auth.role == ROLE_CA {
        ClientRepo::list_for_ca(&state.pool, auth.user_id).await?
    } else {
        ClientRepo::list_for_owner(&state.pool, auth.user_id).await?
    };
    Ok(Json(ApiResponse::ok("OK", clients)))
}

/// POST /api/v1/clients
///
/// Customers create their own profiles; admins may create one on behalf of
/// another user via `userId`.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateClient>,
) -> AppResult<impl IntoResponse> {
    let mut problems = Vec::new();
    if input.pan.trim().is_empty() {
        problems.push("PAN must not be empty".to_string());
    }
    if input.full_name.trim().is_empty() {
        problems.push("Full name must not be empty".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Core(CoreError::Validation(problems)));
    }

    let owner_id = match (auth.role.as_str(), input.user_id) {
        (ROLE_ADMIN, Some(user_id)) => user_id,
        (ROLE_ADMIN, None) | (ROLE_CUSTOMER, _) => auth.user_id,
        _ => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only customers and admins can create client profiles".into(),
            )))
        }
    };

    let client =
        ClientRepo::create(&state.pool, owner_id, input.pan.trim(), input.full_name.trim())
            .await?;

    tracing::info!(client_id = client.id, owner_id, "Client profile created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Client created", client)),
    ))
}

/// GET /api/v1/clients/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let client = fetch_visible(&state, &auth, id).await?;
    Ok(Json(ApiResponse::ok("OK", client)))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<impl IntoResponse> {
    fetch_visible(&state, &auth, id).await?;

    if let Some(pan) = &input.pan {
        if pan.trim().is_empty() {
            return Err(AppError::Core(CoreError::validation(
                "PAN must not be empty",
            )));
        }
    }
    if let Some(name) = &input.full_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::validation(
                "Full name must not be empty",
            )));
        }
    }

    let updated = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Client",
                id,
            })
        })?;

    Ok(Json(ApiResponse::ok("Client updated", updated)))
}

/// PUT /api/v1/clients/{id}/assign-ca (admin only)
///
/// Assign or unassign a CA. The assignment propagates to the client's
/// filings inside one transaction.
pub async fn assign_ca(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AssignCaRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(ca_id) = input.ca_id {
        let ca = UserRepo::find_by_id(&state.pool, ca_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: ca_id,
                })
            })?;
        if ca.role != ROLE_CA {
            return Err(AppError::Core(CoreError::validation(
                "Assignee must have the ca role",
            )));
        }
    }

    let updated = ClientRepo::assign_ca(&state.pool, id, input.ca_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Client",
                id,
            })
        })?;

    tracing::info!(client_id = id, ca_id = ?input.ca_id, "CA assignment updated");

    Ok(Json(ApiResponse::ok("CA assignment updated", updated)))
}
