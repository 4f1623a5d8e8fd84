//! Handlers for the `/onboarding` resource.
//!
//! All onboarding state is keyed to the authenticated user; there are no ids
//! in the URL surface. Payload validation lives in
//! `taxdesk_core::onboarding` and runs on every save, draft or completion;
//! step gating is decided inside the save transaction against the locked
//! progress row, so a concurrent reset cannot slip a step past its prefix.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use taxdesk_core::error::CoreError;
use taxdesk_core::onboarding::{
    self, OnboardingStep, ProgressAction, StepConfig, MAX_STEP,
};
use taxdesk_core::types::DbId;
use taxdesk_db::models::onboarding::{
    CreateOnboardingFile, OnboardingFile, OnboardingProgress, OnboardingStepRecord,
};
use taxdesk_db::repositories::{OnboardingFileRepo, OnboardingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Optional `?step=` query parameter.
#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub step: Option<i32>,
}

/// Required `?step=` query parameter (file listing).
#[derive(Debug, Deserialize)]
pub struct RequiredStepQuery {
    pub step: i32,
}

/// Request body for `POST /onboarding`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStepRequest {
    pub step: i32,
    pub step_name: String,
    pub data: Value,
    #[serde(default)]
    pub mark_as_completed: bool,
}

/// Request body for `PUT /onboarding`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressActionRequest {
    pub action: ProgressAction,
    pub current_step: Option<i32>,
}

/// Payload for `GET /onboarding`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingView {
    pub progress: OnboardingProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<OnboardingStepRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<OnboardingStepRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<OnboardingFile>>,
}

/// Payload for `POST /onboarding`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStepView {
    pub step: OnboardingStepRecord,
    pub progress: OnboardingProgress,
}

/// Payload for `GET /onboarding/config`: one config or all seven.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ConfigView {
    One(&'static StepConfig),
    All(Vec<&'static StepConfig>),
}

/// Payload for `GET /onboarding/progress`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completion_percentage: f64,
    pub completed_steps: Vec<i32>,
    pub is_completed: bool,
}

/// Payload for `GET /onboarding/next-step`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStepView {
    pub step: Option<i32>,
    pub step_name: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Progress and step data
// ---------------------------------------------------------------------------

/// GET /api/v1/onboarding?step=
///
/// The user's progress row (created lazily). With `?step=` the response
/// carries that step's saved data and file records; without it, every saved
/// step record in wizard order.
pub async fn get_onboarding(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<StepQuery>,
) -> AppResult<impl IntoResponse> {
    let progress = OnboardingRepo::get_or_create(&state.pool, auth.user_id).await?;

    let (step, steps, files) = match params.step {
        Some(n) => {
            let step_enum = OnboardingStep::from_number(n)?;
            let record = OnboardingRepo::get_step(&state.pool, auth.user_id, n).await?;
            let files =
                OnboardingFileRepo::list_for_step(&state.pool, auth.user_id, step_enum.to_number())
                    .await?;
            (record, None, Some(files))
        }
        None => {
            let all = OnboardingRepo::list_steps(&state.pool, auth.user_id).await?;
            (None, Some(all), None)
        }
    };

    Ok(Json(ApiResponse::ok(
        "OK",
        OnboardingView {
            progress,
            step,
            steps,
            files,
        },
    )))
}

/// POST /api/v1/onboarding
///
/// Save one step's data, optionally marking the step completed. Gated: a
/// step is writable only when every earlier step is already completed.
pub async fn save_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SaveStepRequest>,
) -> AppResult<impl IntoResponse> {
    let step_enum = OnboardingStep::from_number(body.step)?;
    onboarding::validate_step_name(step_enum, &body.step_name)?;
    onboarding::validate_step_payload(step_enum, &body.data)?;

    // The payment step completes via payment settlement, never by save.
    if body.mark_as_completed && body.step == MAX_STEP {
        return Err(AppError::Core(CoreError::Forbidden(
            "The payment step is completed through payment settlement".into(),
        )));
    }

    // Gating is decided against the row-locked progress inside the save
    // transaction; a denial rolls back and surfaces as None.
    let saved = OnboardingRepo::save_step(
        &state.pool,
        auth.user_id,
        body.step,
        step_enum.name(),
        &body.data,
        body.mark_as_completed,
    )
    .await?;
    let (record, progress) = saved.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(format!(
            "Step {} is not reachable yet; complete the earlier steps first",
            body.step
        )))
    })?;

    tracing::info!(
        user_id = auth.user_id,
        step = body.step,
        completed = body.mark_as_completed,
        "Onboarding step saved"
    );

    Ok(Json(ApiResponse::ok(
        "Step saved",
        SavedStepView {
            step: record,
            progress,
        },
    )))
}

/// PUT /api/v1/onboarding
///
/// Apply a progress action: navigate, complete_payment, fail_payment, or
/// reset (soft -- step data and files survive).
pub async fn apply_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProgressActionRequest>,
) -> AppResult<impl IntoResponse> {
    let progress = match body.action {
        ProgressAction::Navigate => {
            let target = body.current_step.ok_or_else(|| {
                AppError::Core(CoreError::validation(
                    "currentStep is required for the navigate action",
                ))
            })?;
            OnboardingStep::from_number(target)?;

            let progress = OnboardingRepo::get_or_create(&state.pool, auth.user_id).await?;
            if !onboarding::can_access_step(&progress.completed_steps, target) {
                return Err(AppError::Core(CoreError::Forbidden(format!(
                    "Step {target} is not reachable yet"
                ))));
            }
            OnboardingRepo::navigate(&state.pool, auth.user_id, target).await?
        }
        ProgressAction::CompletePayment => {
            OnboardingRepo::set_payment_result(&state.pool, auth.user_id, true).await?
        }
        ProgressAction::FailPayment => {
            OnboardingRepo::set_payment_result(&state.pool, auth.user_id, false).await?
        }
        ProgressAction::Reset => {
            // Soft reset: progress only, step data and files survive.
            OnboardingRepo::get_or_create(&state.pool, auth.user_id).await?;
            OnboardingRepo::reset_progress(&state.pool, auth.user_id).await?
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        action = ?body.action,
        "Onboarding progress action applied"
    );

    Ok(Json(ApiResponse::ok("Progress updated", progress)))
}

/// DELETE /api/v1/onboarding?step=
///
/// With `?step=`: delete that step's record and retract it from the
/// completed set. Without: hard reset -- all steps, files, and progress.
pub async fn reset(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<StepQuery>,
) -> AppResult<impl IntoResponse> {
    match params.step {
        Some(n) => {
            OnboardingStep::from_number(n)?;
            let progress = OnboardingRepo::reset_step(&state.pool, auth.user_id, n).await?;
            Ok(Json(ApiResponse::ok("Step reset", Some(progress))))
        }
        None => {
            OnboardingRepo::reset_all(&state.pool, auth.user_id).await?;
            Ok(Json(ApiResponse::ok("Onboarding data cleared", None)))
        }
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// GET /api/v1/onboarding/files?step=
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RequiredStepQuery>,
) -> AppResult<impl IntoResponse> {
    let step_enum = OnboardingStep::from_number(params.step)?;
    let files =
        OnboardingFileRepo::list_for_step(&state.pool, auth.user_id, step_enum.to_number())
            .await?;
    Ok(Json(ApiResponse::ok("OK", files)))
}

/// POST /api/v1/onboarding/files
///
/// Record file metadata after a successful upload hand-off. The byte
/// transfer itself happens elsewhere; this endpoint validates the metadata
/// against the step's upload policy and persists the record.
pub async fn record_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateOnboardingFile>,
) -> AppResult<impl IntoResponse> {
    let step_enum = OnboardingStep::from_number(input.step)?;

    let existing = OnboardingFileRepo::count_for_step(&state.pool, auth.user_id, input.step).await?;
    onboarding::validate_file_upload(
        step_enum,
        &input.file_type,
        input.file_size,
        &input.mime_type,
        existing as usize,
    )?;

    let file = OnboardingFileRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        step = input.step,
        file_id = file.id,
        "Onboarding file recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("File recorded", file)),
    ))
}

/// DELETE /api/v1/onboarding/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = OnboardingFileRepo::delete(&state.pool, auth.user_id, id).await?;
    if deleted == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "OnboardingFile",
            id,
        }));
    }
    Ok(Json(ApiResponse::message("File deleted")))
}

// ---------------------------------------------------------------------------
// Read-only views
// ---------------------------------------------------------------------------

/// GET /api/v1/onboarding/config?step=
///
/// One step's configuration, or all seven when `?step=` is omitted.
pub async fn get_config(
    _auth: AuthUser,
    Query(params): Query<StepQuery>,
) -> AppResult<impl IntoResponse> {
    let view = match params.step {
        Some(n) => {
            let step_enum = OnboardingStep::from_number(n)?;
            ConfigView::One(onboarding::step_config(step_enum))
        }
        None => ConfigView::All(
            OnboardingStep::all()
                .into_iter()
                .map(onboarding::step_config)
                .collect(),
        ),
    };
    Ok(Json(ApiResponse::ok("OK", view)))
}

/// GET /api/v1/onboarding/progress
pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let progress = OnboardingRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(
        "OK",
        ProgressSummary {
            completion_percentage: onboarding::completion_percentage(&progress.completed_steps),
            completed_steps: progress.completed_steps,
            is_completed: progress.is_completed,
        },
    )))
}

/// GET /api/v1/onboarding/next-step
pub async fn next_step(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let progress = OnboardingRepo::get_or_create(&state.pool, auth.user_id).await?;
    let next = onboarding::next_incomplete_step(&progress.completed_steps);
    Ok(Json(ApiResponse::ok(
        "OK",
        NextStepView {
            step: next.map(OnboardingStep::to_number),
            step_name: next.map(OnboardingStep::name),
        },
    )))
}
