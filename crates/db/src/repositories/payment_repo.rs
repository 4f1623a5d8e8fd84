//! Repository for the `payments` table.
//!
//! Webhook settlement is the one multi-table write: the payment row and the
//! owner's onboarding progress must commit together, so the gateway outcome
//! is never half-applied.

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::payment::{CreatePayment, Payment};
use crate::repositories::OnboardingRepo;

/// Column list for `payments` queries.
const COLUMNS: &str = "id, client_id, filing_id, amount_paise, currency, razorpay_order_id, \
     razorpay_payment_id, status, created_at, updated_at";

/// Provides data access for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a newly created gateway order in `created` status.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (client_id, filing_id, amount_paise, currency, razorpay_order_id) \
             VALUES ($1, $2, $3, COALESCE($4, 'INR'), $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.client_id)
            .bind(input.filing_id)
            .bind(input.amount_paise)
            .bind(&input.currency)
            .bind(&input.razorpay_order_id)
            .fetch_one(pool)
            .await
    }

    /// Find a payment by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a payment by its gateway order id.
    pub async fn find_by_order_id(
        pool: &PgPool,
        order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE razorpay_order_id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(order_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a verified webhook outcome: update the payment row and settle
    /// the owning user's onboarding payment state in one transaction.
    ///
    /// Returns `None` when no payment matches the order id.
    pub async fn settle_webhook(
        pool: &PgPool,
        order_id: &str,
        payment_id: Option<&str>,
        captured: bool,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock_query = format!(
            "SELECT {COLUMNS} FROM payments WHERE razorpay_order_id = $1 FOR UPDATE"
        );
        let Some(payment) = sqlx::query_as::<_, Payment>(&lock_query)
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let status = if captured { "captured" } else { "failed" };
        let update_query = format!(
            "UPDATE payments SET \
                status = $2, \
                razorpay_payment_id = COALESCE($3, razorpay_payment_id), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Payment>(&update_query)
            .bind(payment.id)
            .bind(status)
            .bind(payment_id)
            .fetch_one(&mut *tx)
            .await?;

        let owner: (DbId,) = sqlx::query_as("SELECT user_id FROM clients WHERE id = $1")
            .bind(payment.client_id)
            .fetch_one(&mut *tx)
            .await?;

        OnboardingRepo::settle_payment(&mut tx, owner.0, captured).await?;

        tx.commit().await?;

        tracing::info!(
            payment_id = updated.id,
            order_id,
            status,
            "Payment webhook settled"
        );
        Ok(Some(updated))
    }

    /// Payments for clients owned by one user.
    pub async fn list_for_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT p.{cols} FROM payments p \
             JOIN clients c ON c.id = p.client_id \
             WHERE c.user_id = $1 \
             ORDER BY p.created_at DESC",
            cols = COLUMNS.replace(", ", ", p."),
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Payments for clients assigned to one CA.
    pub async fn list_for_ca(pool: &PgPool, ca_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT p.{cols} FROM payments p \
             JOIN clients c ON c.id = p.client_id \
             WHERE c.ca_id = $1 \
             ORDER BY p.created_at DESC",
            cols = COLUMNS.replace(", ", ", p."),
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(ca_id)
            .fetch_all(pool)
            .await
    }

    /// All payments (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments ORDER BY created_at DESC");
        sqlx::query_as::<_, Payment>(&query).fetch_all(pool).await
    }
}
