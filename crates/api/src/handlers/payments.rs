//! Handlers for the `/payments` resource.
//!
//! Orders are created against a pricing plan; settlement happens either
//! through the client-side checkout callback (signature verified) or through
//! the gateway webhook (raw-body signature verified). Both paths converge on
//! `PaymentRepo::settle_webhook`, which also settles onboarding step 7.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use taxdesk_core::error::CoreError;
use taxdesk_core::payments::{verify_checkout_signature, verify_webhook_signature};
use taxdesk_core::roles::{ROLE_ADMIN, ROLE_CA};
use taxdesk_core::types::DbId;
use taxdesk_db::models::payment::CreatePayment;
use taxdesk_db::repositories::{ClientRepo, FilingRepo, PaymentRepo, PricingPlanRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_visible;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Header carrying the webhook signature from the gateway.
const WEBHOOK_SIGNATURE_HEADER: &str = "x-razorpay-signature";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /payments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub client_id: DbId,
    pub filing_id: Option<DbId>,
    /// Pricing plan the order is for; the amount is taken from the plan.
    pub plan_id: DbId,
    /// Order id issued by the gateway when the order was created there.
    pub razorpay_order_id: String,
}

/// Request body for `POST /payments/verify` (checkout callback).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Minimal shape of a Razorpay webhook event.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    payload: WebhookPayload,
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    payment: WebhookPaymentWrapper,
}

#[derive(Debug, Deserialize)]
struct WebhookPaymentWrapper {
    entity: WebhookPaymentEntity,
}

#[derive(Debug, Deserialize)]
struct WebhookPaymentEntity {
    id: String,
    order_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/payments
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let payments = if auth.role == ROLE_ADMIN {
        PaymentRepo::list_all(&state.pool).await?
    } else if auth.role == ROLE_CA {
        PaymentRepo::list_for_ca(&state.pool, auth.user_id).await?
    } else {
        PaymentRepo::list_for_owner(&state.pool, auth.user_id).await?
    };
    Ok(Json(ApiResponse::ok("OK", payments)))
}

/// POST /api/v1/payments
///
/// Record a gateway order for a visible client. The amount comes from the
/// selected pricing plan, which must be active.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePaymentRequest>,
) -> AppResult<impl IntoResponse> {
    if input.razorpay_order_id.trim().is_empty() {
        return Err(AppError::Core(CoreError::validation(
            "Order id must not be empty",
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

    if let Some(filing_id) = input.filing_id {
        let filing = FilingRepo::find_by_id(&state.pool, filing_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "Filing",
                    id: filing_id,
                })
            })?;
        if filing.client_id != client.id {
            return Err(AppError::Core(CoreError::validation(
                "Filing does not belong to the client",
            )));
        }
    }

    let plan = PricingPlanRepo::find_by_id(&state.pool, input.plan_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "PricingPlan",
                id: input.plan_id,
            })
        })?;
    if !plan.is_active {
        return Err(AppError::Core(CoreError::validation(
            "Pricing plan is not active",
        )));
    }

    let payment = PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            client_id: client.id,
            filing_id: input.filing_id,
            amount_paise: plan.price_paise,
            currency: None,
            razorpay_order_id: input.razorpay_order_id.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(
        payment_id = payment.id,
        client_id = client.id,
        plan_id = plan.id,
        order_id = %payment.razorpay_order_id,
        "Payment order recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Payment order recorded", payment)),
    ))
}

/// GET /api/v1/payments/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payment = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Payment",
                id,
            })
        })?;

    let client = ClientRepo::find_by_id(&state.pool, payment.client_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Payment",
                id,
            })
        })?;
    ensure_visible(&auth, Some(client.user_id), client.ca_id, "Payment", id)?;

    Ok(Json(ApiResponse::ok("OK", payment)))
}

/// POST /api/v1/payments/verify
///
/// Checkout callback: the client posts the gateway's order id, payment id
/// and signature. A valid signature settles the payment as captured.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<VerifyPaymentRequest>,
) -> AppResult<impl IntoResponse> {
    let payment = PaymentRepo::find_by_order_id(&state.pool, &input.razorpay_order_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Unknown payment order".into()))
        })?;

    let client = ClientRepo::find_by_id(&state.pool, payment.client_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Payment",
                id: payment.id,
            })
        })?;
    ensure_visible(
        &auth,
        Some(client.user_id),
        client.ca_id,
        "Payment",
        payment.id,
    )?;

    if let Err(e) = verify_checkout_signature(
        &input.razorpay_order_id,
        &input.razorpay_payment_id,
        &input.razorpay_signature,
        &state.config.razorpay.key_secret,
    ) {
        tracing::warn!(
            order_id = %input.razorpay_order_id,
            "Checkout signature verification failed"
        );
        return Err(AppError::Core(e));
    }

    let settled = PaymentRepo::settle_webhook(
        &state.pool,
        &input.razorpay_order_id,
        Some(&input.razorpay_payment_id),
        true,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Payment",
            id: payment.id,
        })
    })?;

    Ok(Json(ApiResponse::ok("Payment verified", settled)))
}

/// POST /api/v1/payments/webhook (unauthenticated)
///
/// Gateway webhook. The signature is computed over the raw body, so the
/// body must not be deserialized before verification.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing webhook signature".into()))
        })?;

    if let Err(e) = verify_webhook_signature(&body, signature, &state.config.razorpay.webhook_secret)
    {
        tracing::warn!("Webhook signature verification failed");
        return Err(AppError::Core(e));
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {e}")))?;

    let captured = match event.event.as_str() {
        "payment.captured" => true,
        "payment.failed" => false,
        other => {
            tracing::debug!(event = %other, "Ignoring unhandled webhook event");
            return Ok(Json(ApiResponse::message("Event ignored")));
        }
    };

    let entity = &event.payload.payment.entity;
    let settled =
        PaymentRepo::settle_webhook(&state.pool, &entity.order_id, Some(&entity.id), captured)
            .await?;

    match settled {
        Some(payment) => {
            tracing::info!(
                payment_id = payment.id,
                order_id = %entity.order_id,
                event = %event.event,
                "Webhook processed"
            );
            Ok(Json(ApiResponse::message("Webhook processed")))
        }
        None => {
            // Acknowledge so the gateway does not retry an order we never created.
            tracing::warn!(order_id = %entity.order_id, "Webhook for unknown order");
            Ok(Json(ApiResponse::message("Order not found")))
        }
    }
}
