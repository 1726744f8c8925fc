//! # Cadre Core Library
//!
//! Shared types and business logic for the Cadre API server: the audit
//! scope mechanism, database models, connection pooling, and request
//! authentication.
//!
//! ## Module Organization
//!
//! - `audit`: Scoped username registry and audit stamping errors
//! - `models`: Database models and their CRUD operations
//! - `db`: Connection pool and migrations
//! - `auth`: JWT validation and the request-user middleware

pub mod audit;
pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Cadre core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
