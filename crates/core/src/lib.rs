//! Domain logic for the taxdesk platform.
//!
//! Everything in this crate is pure: no I/O, no database, no HTTP. The API
//! and repository layers call into these modules for validation, access
//! decisions, and onboarding step rules.

pub mod access;
pub mod error;
pub mod filing;
pub mod onboarding;
pub mod payments;
pub mod roles;
pub mod types;
