pub mod admin;
pub mod auth;
pub mod clients;
pub mod documents;
pub mod filings;
pub mod health;
pub mod notifications;
pub mod onboarding;
pub mod payments;

use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
/// /auth/refresh                     refresh (public)
/// /auth/logout                      logout (requires auth)
/// /auth/me                          current user
///
/// /onboarding                       wizard state: get, save, action, reset
/// /onboarding/config                step configuration
/// /onboarding/progress              completion summary
/// /onboarding/next-step             first incomplete step
/// /onboarding/files                 per-step file records
///
/// /clients                          list, create
/// /clients/{id}                     get, update
/// /clients/{id}/assign-ca           CA assignment (admin only)
///
/// /filings                          list, create
/// /filings/{id}                     get, status transition
/// /filings/{id}/documents           list, record
///
/// /documents/{id}/verify            verify or reject (assigned CA / admin)
/// /documents/{id}                   delete (uploader / admin)
///
/// /payments                         list, record order
/// /payments/{id}                    get
/// /payments/verify                  checkout callback verification
/// /payments/webhook                 gateway webhook (public)
///
/// /pricing-plans                    active plans (any authenticated user)
///
/// /notifications                    list own notifications
/// /notifications/{id}/read          mark read
///
/// /admin/users                      user administration (admin only)
/// /admin/pricing-plans              plan management (admin only)
/// /admin/tax-slabs                  slab management (admin only)
/// /admin/notification-defaults      platform defaults (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, refresh, logout, me).
        .nest("/auth", auth::router())
        // Onboarding wizard, keyed by the authenticated user.
        .nest("/onboarding", onboarding::router())
        // Client profiles, scoped by role.
        .nest("/clients", clients::router())
        // Filings and their document sub-resource.
        .nest("/filings", filings::router())
        // Document operations addressed by document id.
        .nest("/documents", documents::router())
        // Payment orders, checkout verification, and the gateway webhook.
        .nest("/payments", payments::router())
        // Active plans, readable by any authenticated user.
        .route("/pricing-plans", get(settings::list_active_plans))
        // In-app notifications.
        .nest("/notifications", notifications::router())
        // Admin-only settings and user administration.
        .nest("/admin", admin::router())
}
