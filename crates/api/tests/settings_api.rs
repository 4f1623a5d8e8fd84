//! HTTP-level integration tests for admin settings and user administration.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Pricing plans
// ---------------------------------------------------------------------------

/// Plan CRUD works for admins; the public listing shows only active plans.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pricing_plan_crud(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "planadmin@test.com", "admin").await;
    let (_cust, cust_token) = common::auth_user(&pool, "plancust@test.com", "customer").await;

    let body = serde_json::json!({
        "name": "Salaried Basic",
        "description": "ITR-1 filing",
        "pricePaise": 99_900,
        "features": ["form16", "one-revision"]
    });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/admin/pricing-plans", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let plan_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["isActive"], true);

    // Deactivate it.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "isActive": false });
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/pricing-plans/{plan_id}"),
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Customers see only active plans; admins see everything.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/pricing-plans", &cust_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/pricing-plans", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Delete.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/admin/pricing-plans/{plan_id}"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/admin/pricing-plans/{plan_id}"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Invalid plans are rejected; duplicates conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pricing_plan_validation(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "planval@test.com", "admin").await;

    let body = serde_json::json!({ "name": "", "description": "x", "pricePaise": 0 });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/admin/pricing-plans", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);

    let body = serde_json::json!({ "name": "Dup", "description": "x", "pricePaise": 100 });
    let app = common::build_test_app(pool.clone());
    let first = post_json_auth(app, "/api/v1/admin/pricing-plans", body.clone(), &admin_token).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let second = post_json_auth(app, "/api/v1/admin/pricing-plans", body, &admin_token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Tax slabs
// ---------------------------------------------------------------------------

/// Slab creation validates bounds and regime; listing filters by year.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_tax_slabs(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "slabadmin@test.com", "admin").await;

    let body = serde_json::json!({
        "regime": "new",
        "slabFromPaise": 0,
        "slabToPaise": 30_000_000,
        "ratePercent": 0.0,
        "assessmentYear": "2025-26"
    });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/admin/tax-slabs", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Open-ended top slab for a different year.
    let body = serde_json::json!({
        "regime": "old",
        "slabFromPaise": 100_000_000,
        "slabToPaise": null,
        "ratePercent": 30.0,
        "assessmentYear": "2024-25"
    });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/admin/tax-slabs", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Inverted bounds, bad regime, and out-of-range rate are all reported.
    let body = serde_json::json!({
        "regime": "flat",
        "slabFromPaise": 500,
        "slabToPaise": 100,
        "ratePercent": 120.0,
        "assessmentYear": ""
    });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/admin/tax-slabs", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"].as_array().unwrap().len(), 4);

    // Year filter.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        "/api/v1/admin/tax-slabs?assessmentYear=2025-26",
        &admin_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/tax-slabs", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Notification defaults
// ---------------------------------------------------------------------------

/// The defaults row materializes on first read and updates partially.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_notification_defaults(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "ndadmin@test.com", "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/notification-defaults", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["emailEnabled"], true);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "smsEnabled": true, "reminderDays": 14 });
    let response = put_json_auth(
        app,
        "/api/v1/admin/notification-defaults",
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["smsEnabled"], true);
    assert_eq!(json["data"]["reminderDays"], 14);
    // Untouched fields keep their values.
    assert_eq!(json["data"]["emailEnabled"], true);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "reminderDays": -1 });
    let response = put_json_auth(
        app,
        "/api/v1/admin/notification-defaults",
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// User administration
// ---------------------------------------------------------------------------

/// Role changes validate the role name and forbid self-modification.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_role_management(pool: PgPool) {
    let (admin, admin_token) = common::auth_user(&pool, "uadmin@test.com", "admin").await;
    let (user, _) = common::create_test_user(&pool, "promote@test.com", "customer").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "role": "ca" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}/role", user.id),
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "ca");

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "role": "superuser" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}/role", user.id),
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "role": "customer" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}/role", admin.id),
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deactivation locks the user out; activation restores access.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_deactivation_cycle(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "deadmin@test.com", "admin").await;
    let (user, password) = common::create_test_user(&pool, "victim@test.com", "customer").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/users/{}/deactivate", user.id),
        serde_json::json!({}),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "victim@test.com", "password": password });
    let response = common::post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/users/{}/activate", user.id),
        serde_json::json!({}),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "victim@test.com", "password": password });
    let response = common::post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Every admin route rejects CA and customer tokens with 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_routes_are_admin_only(pool: PgPool) {
    let (_ca, ca_token) = common::auth_user(&pool, "notadmin@test.com", "ca").await;

    for uri in [
        "/api/v1/admin/users",
        "/api/v1/admin/pricing-plans",
        "/api/v1/admin/tax-slabs",
        "/api/v1/admin/notification-defaults",
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, uri, &ca_token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri} must be admin-only");
    }
}
