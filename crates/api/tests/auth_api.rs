//! HTTP-level integration tests for the auth endpoints.
//!
//! Covers registration, login, token refresh and rotation, logout, RBAC
//! enforcement, and account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

/// Registration creates a customer account and returns 201 without tokens.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "NewUser@Test.com",
        "password": "strong_password_123!",
        "fullName": "New User"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    // Email is normalized to lowercase and the role is always customer.
    assert_eq!(json["data"]["email"], "newuser@test.com");
    assert_eq!(json["data"]["role"], "customer");
    assert!(json["data"]["passwordHash"].is_null(), "hash must never leak");
}

/// Registration aggregates all validation problems into one 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_aggregates_validation_errors(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "not-an-email",
        "password": "short",
        "fullName": ""
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    let errors = json["errors"].as_array().expect("errors array expected");
    assert_eq!(errors.len(), 3, "all three problems should be reported");
}

/// Registering the same email twice returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let body = serde_json::json!({
        "email": "dup@test.com",
        "password": "strong_password_123!",
        "fullName": "Dup"
    });

    let app = common::build_test_app(pool.clone());
    let first = post_json(app, "/api/v1/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let second = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Successful login returns tokens and the user profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (user, password) = common::create_test_user(&pool, "login@test.com", "customer").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "login@test.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["accessToken"].is_string());
    assert!(json["data"]["refreshToken"].is_string());
    assert!(json["data"]["expiresIn"].is_number());
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["email"], "login@test.com");
}

/// Login with a wrong password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_test_user(&pool, "wrongpw@test.com", "customer").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrongpw@test.com", "password": "incorrect" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with an unknown email returns 401 with the same message shape.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@test.com", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A deactivated account cannot log in.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_deactivated_account(pool: PgPool) {
    use taxdesk_db::repositories::UserRepo;

    let (user, password) = common::create_test_user(&pool, "inactive@test.com", "customer").await;
    UserRepo::set_active(&pool, user.id, false)
        .await
        .expect("deactivation should succeed");

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "inactive@test.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Account lockout: the fifth consecutive failure locks the account.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_account_lockout(pool: PgPool) {
    common::create_test_user(&pool, "lockme@test.com", "customer").await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "email": "lockme@test.com", "password": "wrong_pass" });
        let response = post_json(app, "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Locked now; even the correct password is rejected with 403.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "lockme@test.com", "password": "test_password_123!" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    let message = json["message"].as_str().unwrap_or("");
    assert!(
        message.contains("locked"),
        "message should mention the lock, got: {message}"
    );
}

/// A valid refresh token rotates: new tokens are issued, the old one dies.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    let (_user, password) = common::create_test_user(&pool, "refresh@test.com", "customer").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "refresh@test.com", "password": password });
    let login = post_json(app, "/api/v1/auth/login", body).await;
    let login_json = body_json(login).await;
    let refresh_token = login_json["data"]["refreshToken"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refreshToken": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_refresh = json["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(new_refresh, refresh_token, "refresh token must rotate");

    // The consumed token is revoked and cannot be replayed.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refreshToken": refresh_token });
    let replay = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing with garbage returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refreshToken": "not-a-real-token" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every session for the user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    let (_user, password) = common::create_test_user(&pool, "logout@test.com", "customer").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "logout@test.com", "password": password });
    let login = post_json(app, "/api/v1/auth/login", body).await;
    let login_json = body_json(login).await;
    let access = login_json["data"]["accessToken"].as_str().unwrap().to_string();
    let refresh = login_json["data"]["refreshToken"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/logout", serde_json::json!({}), &access).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The refresh token issued before logout is now useless.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refreshToken": refresh });
    let replay = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

/// GET /auth/me returns the caller's profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me(pool: PgPool) {
    let (user, token) = common::auth_user(&pool, "me@test.com", "customer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["email"], "me@test.com");
}

/// Protected endpoints require a token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_endpoint_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/clients").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Admin endpoints reject non-admin roles with 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_endpoint_requires_admin_role(pool: PgPool) {
    let (_user, token) = common::auth_user(&pool, "plaincust@test.com", "customer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
