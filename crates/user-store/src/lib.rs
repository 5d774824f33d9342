//! User Store
//!
//! SQLite persistence for user accounts: registration with uniqueness
//! enforced by the database, and login against SHA-256 password digests.
//! Accounts are never updated or deleted.

mod store;

pub use store::{UserRecord, UserStore};

use thiserror::Error;

/// User store errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Username or email already registered
    #[error("username or email already registered")]
    DuplicateUser,

    /// Credentials do not match a stored record
    #[error("invalid username or password")]
    AuthFailure,

    /// A registration field failed validation
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
