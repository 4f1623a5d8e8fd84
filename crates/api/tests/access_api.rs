//! HTTP-level integration tests for role-scoped resource access across
//! clients, filings, and documents.
//!
//! Scoping denials surface as 404 so out-of-scope actors cannot probe which
//! ids exist; role-gated operations on visible resources return 403.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

/// Create a client profile via the API and return its id.
async fn create_client(app: Router, token: &str, pan: &str) -> i64 {
    let body = serde_json::json!({ "pan": pan, "fullName": "Test Client" });
    let response = post_json_auth(app, "/api/v1/clients", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("client id")
}

/// Create a draft filing for a client via the API and return its id.
async fn create_filing(app: Router, token: &str, client_id: i64) -> i64 {
    let body = serde_json::json!({ "clientId": client_id, "assessmentYear": "2025-26" });
    let response = post_json_auth(app, "/api/v1/filings", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("filing id")
}

/// Record a document on a filing via the API and return its id.
async fn create_document(app: Router, token: &str, filing_id: i64) -> i64 {
    let body = serde_json::json!({
        "docType": "form16",
        "originalName": "form16.pdf",
        "filePath": "uploads/docs/form16.pdf",
        "fileSize": 102400,
        "mimeType": "application/pdf"
    });
    let response =
        post_json_auth(app, &format!("/api/v1/filings/{filing_id}/documents"), body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("document id")
}

/// Assign a CA to a client (admin action).
async fn assign_ca(app: Router, admin_token: &str, client_id: i64, ca_id: i64) {
    let body = serde_json::json!({ "caId": ca_id });
    let response = put_json_auth(
        app,
        &format!("/api/v1/clients/{client_id}/assign-ca"),
        body,
        admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Client scoping
// ---------------------------------------------------------------------------

/// A customer sees only their own clients; another customer's id reads 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_cannot_see_foreign_client(pool: PgPool) {
    let (_a, token_a) = common::auth_user(&pool, "owner-a@test.com", "customer").await;
    let (_b, token_b) = common::auth_user(&pool, "owner-b@test.com", "customer").await;

    let client_a = create_client(common::build_test_app(pool.clone()), &token_a, "AAAPA1111A").await;

    // The foreign client reads as not found, not forbidden.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/clients/{client_a}"), &token_b).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And it never shows up in the other customer's list.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/clients", &token_b).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

/// A CA sees exactly the clients assigned to them.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ca_sees_only_assigned_clients(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "admin@test.com", "admin").await;
    let (ca, ca_token) = common::auth_user(&pool, "ca@test.com", "ca").await;
    let (_cust, cust_token) = common::auth_user(&pool, "cust@test.com", "customer").await;

    let assigned =
        create_client(common::build_test_app(pool.clone()), &cust_token, "BBBPB2222B").await;
    let unassigned =
        create_client(common::build_test_app(pool.clone()), &cust_token, "CCCPC3333C").await;
    assign_ca(common::build_test_app(pool.clone()), &admin_token, assigned, ca.id).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/clients", &ca_token).await;
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![assigned]);

    // The unassigned client is invisible to the CA.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/clients/{unassigned}"), &ca_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The admin sees both.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/clients", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

/// CAs cannot create client profiles.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ca_cannot_create_client(pool: PgPool) {
    let (_ca, ca_token) = common::auth_user(&pool, "nocreate@test.com", "ca").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "pan": "DDDPD4444D", "fullName": "Someone" });
    let response = post_json_auth(app, "/api/v1/clients", body, &ca_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Assigning a non-CA user is rejected; non-admins cannot assign at all.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_ca_validation(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "assigner@test.com", "admin").await;
    let (cust, cust_token) = common::auth_user(&pool, "assignee@test.com", "customer").await;

    let client =
        create_client(common::build_test_app(pool.clone()), &cust_token, "EEEPE5555E").await;

    // Target user has the customer role, not ca.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "caId": cust.id });
    let response = put_json_auth(
        app,
        &format!("/api/v1/clients/{client}/assign-ca"),
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The owner cannot self-serve an assignment.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "caId": null });
    let response = put_json_auth(
        app,
        &format!("/api/v1/clients/{client}/assign-ca"),
        body,
        &cust_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Filing lifecycle and scoping
// ---------------------------------------------------------------------------

/// Filings inherit the client's CA and follow the status lifecycle.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_filing_lifecycle(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "fadmin@test.com", "admin").await;
    let (ca, ca_token) = common::auth_user(&pool, "fca@test.com", "ca").await;
    let (_cust, cust_token) = common::auth_user(&pool, "fcust@test.com", "customer").await;

    let client =
        create_client(common::build_test_app(pool.clone()), &cust_token, "FFFPF6666F").await;
    assign_ca(common::build_test_app(pool.clone()), &admin_token, client, ca.id).await;
    let filing = create_filing(common::build_test_app(pool.clone()), &cust_token, client).await;

    // The owner submits the draft for review.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "in_review" });
    let response = put_json_auth(app, &format!("/api/v1/filings/{filing}"), body, &cust_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The owner cannot decide the review outcome.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "filed" });
    let response = put_json_auth(app, &format!("/api/v1/filings/{filing}"), body, &cust_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The assigned CA can.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "filed" });
    let response = put_json_auth(app, &format!("/api/v1/filings/{filing}"), body, &ca_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "filed");

    // Filed is terminal.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "in_review" });
    let response = put_json_auth(app, &format!("/api/v1/filings/{filing}"), body, &ca_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Skipping the lifecycle (draft -> filed) is rejected even for admins.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_filing_cannot_skip_review(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "skipadmin@test.com", "admin").await;
    let (_cust, cust_token) = common::auth_user(&pool, "skipcust@test.com", "customer").await;

    let client =
        create_client(common::build_test_app(pool.clone()), &cust_token, "GGGPG7777G").await;
    let filing = create_filing(common::build_test_app(pool.clone()), &cust_token, client).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "filed" });
    let response =
        put_json_auth(app, &format!("/api/v1/filings/{filing}"), body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A foreign filing reads as 404 for out-of-scope customers.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_filing_scoping(pool: PgPool) {
    let (_a, token_a) = common::auth_user(&pool, "fil-a@test.com", "customer").await;
    let (_b, token_b) = common::auth_user(&pool, "fil-b@test.com", "customer").await;

    let client = create_client(common::build_test_app(pool.clone()), &token_a, "HHHPH8888H").await;
    let filing = create_filing(common::build_test_app(pool.clone()), &token_a, client).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/filings/{filing}"), &token_b).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Document verification
// ---------------------------------------------------------------------------

/// Only the assigned CA or an admin can verify; the owner gets 403, an
/// outsider 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_document_verification_roles(pool: PgPool) {
    let (_admin, admin_token) = common::auth_user(&pool, "dadmin@test.com", "admin").await;
    let (ca, ca_token) = common::auth_user(&pool, "dca@test.com", "ca").await;
    let (_cust, cust_token) = common::auth_user(&pool, "dcust@test.com", "customer").await;
    let (_other, other_token) = common::auth_user(&pool, "dother@test.com", "customer").await;

    let client =
        create_client(common::build_test_app(pool.clone()), &cust_token, "IIIPI9999I").await;
    assign_ca(common::build_test_app(pool.clone()), &admin_token, client, ca.id).await;
    let filing = create_filing(common::build_test_app(pool.clone()), &cust_token, client).await;
    let doc = create_document(common::build_test_app(pool.clone()), &cust_token, filing).await;

    // The owner can see the document but cannot verify it.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "verified" });
    let response =
        post_json_auth(app, &format!("/api/v1/documents/{doc}/verify"), body, &cust_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An unrelated customer cannot even see it.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "verified" });
    let response =
        post_json_auth(app, &format!("/api/v1/documents/{doc}/verify"), body, &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A status outside the accepted pair is a 400.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "approved" });
    let response =
        post_json_auth(app, &format!("/api/v1/documents/{doc}/verify"), body, &ca_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The assigned CA verifies.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "verified" });
    let response =
        post_json_auth(app, &format!("/api/v1/documents/{doc}/verify"), body, &ca_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "verified");
    assert_eq!(json["data"]["verifiedBy"], ca.id);

    // Deletion is reserved for the uploader and admins.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/documents/{doc}"), &ca_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/documents/{doc}"), &cust_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}
