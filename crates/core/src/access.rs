//! Role-scoped access decisions for owned and assigned resources.
//!
//! Every resource-facing operation evaluates [`authorize`] before reading or
//! mutating a concrete entity. The rule is uniform across clients, filings,
//! documents, and payments:
//!
//! - `admin` bypasses all scoping.
//! - `ca` may act only on resources whose assigned CA is the actor.
//! - `customer` may act only on resources owned by the actor.
//!
//! Whether a denial surfaces as 403 or 404 is the caller's concern; resource
//! handlers map denials to `NotFound` so a caller cannot probe for the
//! existence of resources it is not allowed to see.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_CA, ROLE_CUSTOMER};
use crate::types::DbId;

/// Decide whether an actor may act on a resource.
///
/// `owner_id` is the id of the user who owns the resource (resolved through
/// the owning client where necessary); `assignee_id` is the CA assigned to
/// it, if any.
pub fn authorize(
    actor_id: DbId,
    actor_role: &str,
    owner_id: Option<DbId>,
    assignee_id: Option<DbId>,
) -> Result<(), CoreError> {
    let allowed = if actor_role == ROLE_ADMIN {
        true
    } else if actor_role == ROLE_CA {
        assignee_id == Some(actor_id)
    } else if actor_role == ROLE_CUSTOMER {
        owner_id == Some(actor_id)
    } else {
        false
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not permitted to access this resource".to_string(),
        ))
    }
}
