//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in the users
//! migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CA: &str = "ca";
pub const ROLE_CUSTOMER: &str = "customer";

/// True if `role` is one of the three platform roles.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_CA || role == ROLE_CUSTOMER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        assert!(is_valid_role(ROLE_ADMIN));
        assert!(is_valid_role(ROLE_CA));
        assert!(is_valid_role(ROLE_CUSTOMER));
    }

    #[test]
    fn unknown_roles_are_invalid() {
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
        assert!(!is_valid_role("Admin"));
    }
}
