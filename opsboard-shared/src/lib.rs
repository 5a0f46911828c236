//! # Opsboard Shared Library
//!
//! This crate contains the models, authentication primitives, and
//! authorization policy shared by the Opsboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data access (users, teams, memberships, items)
//! - `auth`: Password hashing, JWT tokens, and the authorization policy
//! - `db`: Connection pool management and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Opsboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
