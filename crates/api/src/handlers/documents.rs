//! Handlers for document metadata under filings.
//!
//! Only metadata is handled here; byte transfer and physical storage happen
//! outside this service. Visibility follows the owning filing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use taxdesk_core::error::CoreError;
use taxdesk_core::roles::{ROLE_ADMIN, ROLE_CA};
use taxdesk_core::types::DbId;
use taxdesk_db::models::document::{CreateDocument, Document};
use taxdesk_db::repositories::DocumentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::filings::fetch_visible as fetch_visible_filing;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /documents/{id}/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyDocumentRequest {
    /// `verified` or `rejected`.
    pub status: String,
}

/// Fetch a document and enforce visibility via its owning filing.
async fn fetch_visible(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<(Document, Option<DbId>)> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Document",
                id,
            })
        })?;

    let filing = fetch_visible_filing(state, auth, document.filing_id)
        .await
        .map_err(|_| {
            AppError::Core(CoreError::NotFound {
                entity: "Document",
                id,
            })
        })?;

    Ok((document, filing.ca_id))
}

/// GET /api/v1/filings/{id}/documents
pub async fn list_for_filing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    fetch_visible_filing(&state, &auth, filing_id).await?;
    let documents = DocumentRepo::list_for_filing(&state.pool, filing_id).await?;
    Ok(Json(ApiResponse::ok("OK", documents)))
}

/// POST /api/v1/filings/{id}/documents
///
/// Record an uploaded document against a visible filing.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filing_id): Path<DbId>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    let mut problems = Vec::new();
    if input.doc_type.trim().is_empty() {
        problems.push("Document type must not be empty".to_string());
    }
    if input.original_name.trim().is_empty() {
        problems.push("Original file name must not be empty".to_string());
    }
    if input.file_size <= 0 {
        problems.push("File size must be positive".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Core(CoreError::Validation(problems)));
    }

    fetch_visible_filing(&state, &auth, filing_id).await?;

    let document = DocumentRepo::create(&state.pool, filing_id, auth.user_id, &input).await?;

    tracing::info!(
        document_id = document.id,
        filing_id,
        uploaded_by = auth.user_id,
        "Document recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Document recorded", document)),
    ))
}

/// POST /api/v1/documents/{id}/verify
///
/// Mark a document verified or rejected. Reserved for the assigned CA and
/// admins; the owning customer sees the document but cannot verify it.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<VerifyDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    if input.status != "verified" && input.status != "rejected" {
        return Err(AppError::Core(CoreError::validation(
            "Status must be 'verified' or 'rejected'",
        )));
    }

    let (document, filing_ca) = fetch_visible(&state, &auth, id).await?;

    let is_assigned_ca = auth.role == ROLE_CA && filing_ca == Some(auth.user_id);
    if auth.role != ROLE_ADMIN && !is_assigned_ca {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assigned CA or an admin can verify documents".into(),
        )));
    }

    let updated = DocumentRepo::set_verification(&state.pool, document.id, auth.user_id, &input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Document",
                id,
            })
        })?;

    tracing::info!(
        document_id = id,
        status = %input.status,
        verified_by = auth.user_id,
        "Document verification recorded"
    );

    Ok(Json(ApiResponse::ok("Document verification recorded", updated)))
}

/// DELETE /api/v1/documents/{id}
///
/// Delete a document record. Allowed for the uploader and admins.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (document, _) = fetch_visible(&state, &auth, id).await?;

    if auth.role != ROLE_ADMIN && document.uploaded_by != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the uploader or an admin can delete a document".into(),
        )));
    }

    DocumentRepo::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("Document deleted")))
}
