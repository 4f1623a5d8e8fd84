//! Admin settings handlers: pricing plans, tax slabs, notification defaults,
//! and user administration.
//!
//! Everything here sits behind the `RequireAdmin` extractor except the
//! active-plan listing, which any authenticated user may read to pick a
//! package during onboarding.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use taxdesk_core::error::CoreError;
use taxdesk_core::roles::is_valid_role;
use taxdesk_core::types::DbId;
use taxdesk_db::models::settings::{
    CreatePricingPlan, CreateTaxSlab, UpdateNotificationDefaults, UpdatePricingPlan,
};
use taxdesk_db::models::user::UserResponse;
use taxdesk_db::repositories::{PricingPlanRepo, SettingsRepo, TaxSlabRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for listing tax slabs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabQuery {
    pub assessment_year: Option<String>,
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ---------------------------------------------------------------------------
// Pricing plans
// ---------------------------------------------------------------------------

/// GET /api/v1/pricing-plans
///
/// Active plans, visible to any authenticated user.
pub async fn list_active_plans(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let plans = PricingPlanRepo::list(&state.pool, true).await?;
    Ok(Json(ApiResponse::ok("OK", plans)))
}

/// GET /api/v1/admin/pricing-plans (admin only)
pub async fn list_plans(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let plans = PricingPlanRepo::list(&state.pool, false).await?;
    Ok(Json(ApiResponse::ok("OK", plans)))
}

/// POST /api/v1/admin/pricing-plans (admin only)
pub async fn create_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreatePricingPlan>,
) -> AppResult<impl IntoResponse> {
    let mut problems = Vec::new();
    if input.name.trim().is_empty() {
        problems.push("Plan name must not be empty".to_string());
    }
    if input.price_paise <= 0 {
        problems.push("Price must be positive".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Core(CoreError::Validation(problems)));
    }

    let plan = PricingPlanRepo::create(&state.pool, &input).await?;
    tracing::info!(plan_id = plan.id, name = %plan.name, "Pricing plan created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Pricing plan created", plan)),
    ))
}

/// PUT /api/v1/admin/pricing-plans/{id} (admin only)
pub async fn update_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePricingPlan>,
) -> AppResult<impl IntoResponse> {
    if let Some(price) = input.price_paise {
        if price <= 0 {
            return Err(AppError::Core(CoreError::validation(
                "Price must be positive",
            )));
        }
    }
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::validation(
                "Plan name must not be empty",
            )));
        }
    }

    let plan = PricingPlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "PricingPlan",
                id,
            })
        })?;

    Ok(Json(ApiResponse::ok("Pricing plan updated", plan)))
}

/// DELETE /api/v1/admin/pricing-plans/{id} (admin only)
pub async fn delete_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PricingPlanRepo::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PricingPlan",
            id,
        }));
    }
    Ok(Json(ApiResponse::message("Pricing plan deleted")))
}

// ---------------------------------------------------------------------------
// Tax slabs
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/tax-slabs (admin only)
pub async fn list_slabs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SlabQuery>,
) -> AppResult<impl IntoResponse> {
    let slabs = match query.assessment_year {
        Some(year) => TaxSlabRepo::list_for_year(&state.pool, &year).await?,
        None => TaxSlabRepo::list_all(&state.pool).await?,
    };
    Ok(Json(ApiResponse::ok("OK", slabs)))
}

/// POST /api/v1/admin/tax-slabs (admin only)
pub async fn create_slab(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateTaxSlab>,
) -> AppResult<impl IntoResponse> {
    let mut problems = Vec::new();
    if input.regime != "old" && input.regime != "new" {
        problems.push("Regime must be 'old' or 'new'".to_string());
    }
    if input.slab_from_paise < 0 {
        problems.push("Slab lower bound must not be negative".to_string());
    }
    if let Some(to) = input.slab_to_paise {
        if to <= input.slab_from_paise {
            problems.push("Slab upper bound must exceed the lower bound".to_string());
        }
    }
    if !(0.0..=100.0).contains(&input.rate_percent) {
        problems.push("Rate must be between 0 and 100".to_string());
    }
    if input.assessment_year.trim().is_empty() {
        problems.push("Assessment year must not be empty".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Core(CoreError::Validation(problems)));
    }

    let slab = TaxSlabRepo::create(&state.pool, &input).await?;
    tracing::info!(
        slab_id = slab.id,
        regime = %slab.regime,
        assessment_year = %slab.assessment_year,
        "Tax slab created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Tax slab created", slab)),
    ))
}

/// DELETE /api/v1/admin/tax-slabs/{id} (admin only)
pub async fn delete_slab(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = TaxSlabRepo::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TaxSlab",
            id,
        }));
    }
    Ok(Json(ApiResponse::message("Tax slab deleted")))
}

// ---------------------------------------------------------------------------
// Notification defaults
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/notification-defaults (admin only)
pub async fn get_notification_defaults(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let defaults = SettingsRepo::get_or_create(&state.pool).await?;
    Ok(Json(ApiResponse::ok("OK", defaults)))
}

/// PUT /api/v1/admin/notification-defaults (admin only)
pub async fn update_notification_defaults(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<UpdateNotificationDefaults>,
) -> AppResult<impl IntoResponse> {
    if let Some(days) = input.reminder_days {
        if days < 0 {
            return Err(AppError::Core(CoreError::validation(
                "Reminder days must not be negative",
            )));
        }
    }

    let defaults = SettingsRepo::update(&state.pool, &input).await?;
    Ok(Json(ApiResponse::ok("Notification defaults updated", defaults)))
}

// ---------------------------------------------------------------------------
// User administration
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<UserListQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(ApiResponse::ok("OK", users)))
}

/// PUT /api/v1/admin/users/{id}/role (admin only)
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::validation(
            "Role must be 'admin', 'ca', or 'customer'",
        )));
    }
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::validation(
            "Cannot change your own role",
        )));
    }

    let user = UserRepo::update_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, role = %input.role, "User role updated");

    Ok(Json(ApiResponse::ok("Role updated", UserResponse::from(user))))
}

/// POST /api/v1/admin/users/{id}/deactivate (admin only)
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::validation(
            "Cannot deactivate your own account",
        )));
    }

    let user = UserRepo::set_active(&state.pool, id, false)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, "User deactivated");

    Ok(Json(ApiResponse::ok("User deactivated", UserResponse::from(user))))
}

/// POST /api/v1/admin/users/{id}/activate (admin only)
pub async fn activate_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::set_active(&state.pool, id, true)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, "User activated");

    Ok(Json(ApiResponse::ok("User activated", UserResponse::from(user))))
}
