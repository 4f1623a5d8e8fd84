//! Repository for the `clients` table.

use sqlx::PgPool;
use taxdesk_core::types::DbId;

use crate::models::client::{Client, UpdateClient};

/// Column list for `clients` queries.
const COLUMNS: &str = "id, user_id, ca_id, pan, full_name, created_at, updated_at";

/// Provides data access for client tax profiles.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client profile owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        pan: &str,
        full_name: &str,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (user_id, pan, full_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .bind(pan)
            .bind(full_name)
            .fetch_one(pool)
            .await
    }

    /// Find a client by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a client's editable fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET \
                pan = COALESCE($2, pan), \
                full_name = COALESCE($3, full_name), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.pan)
            .bind(&input.full_name)
            .fetch_optional(pool)
            .await
    }

    /// Assign (or clear) the CA for a client, and propagate the assignment
    /// to the client's filings so filing-level scoping stays consistent.
    pub async fn assign_ca(
        pool: &PgPool,
        id: DbId,
        ca_id: Option<DbId>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE clients SET ca_id = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(ca_id)
            .fetch_optional(&mut *tx)
            .await?;

        if client.is_some() {
            sqlx::query("UPDATE filings SET ca_id = $2, updated_at = now() WHERE client_id = $1")
                .bind(id)
                .bind(ca_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(client)
    }

    /// Clients owned by one user.
    pub async fn list_for_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Clients assigned to one CA.
    pub async fn list_for_ca(pool: &PgPool, ca_id: DbId) -> Result<Vec<Client>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM clients WHERE ca_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Client>(&query)
            .bind(ca_id)
            .fetch_all(pool)
            .await
    }

    /// All clients (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY created_at DESC");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }
}
