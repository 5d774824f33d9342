//! User Store Implementation

use crate::UserStoreError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// A stored account, without its credential digest
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed user registry
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Connect to the database at `url` and ensure the schema exists
    pub async fn connect(url: &str) -> Result<Self, UserStoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(UserStoreError::Database)?
            .create_if_missing(true);
        // SQLite serializes writers anyway, and a single persistent
        // connection keeps `sqlite::memory:` databases coherent across
        // requests.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        info!(url, "user store ready");
        Ok(Self { pool })
    }

    /// Register a new account.
    ///
    /// Uniqueness of both username and email is enforced by the table
    /// constraints; the insert itself is the uniqueness check, so two
    /// concurrent registrations cannot race past it.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, UserStoreError> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(hash_password(password))
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!(username, "registered user");
                Ok(UserRecord {
                    username: username.to_string(),
                    email: email.to_string(),
                    created_at,
                })
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                debug!(username, "duplicate registration rejected");
                Err(UserStoreError::DuplicateUser)
            }
            Err(err) => Err(UserStoreError::Database(err)),
        }
    }

    /// Check credentials against a stored record.
    ///
    /// An unknown username and a wrong password both report the same
    /// failure; callers cannot probe which usernames exist.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserRecord, UserStoreError> {
        let row = sqlx::query(
            "SELECT username, email, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(UserStoreError::AuthFailure)?;
        let stored_hash: String = row.get("password_hash");
        if stored_hash != hash_password(password) {
            return Err(UserStoreError::AuthFailure);
        }

        Ok(UserRecord {
            username: row.get("username"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        })
    }

    /// Number of registered accounts
    pub async fn user_count(&self) -> Result<i64, UserStoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}

/// Lowercase hex SHA-256 digest of a password
fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn validate_username(username: &str) -> Result<(), UserStoreError> {
    if username.trim().is_empty() {
        return Err(UserStoreError::InvalidField {
            field: "username",
            reason: "must not be empty",
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserStoreError> {
    let invalid = UserStoreError::InvalidField {
        field: "email",
        reason: "must look like local@domain.tld",
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid);
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(invalid);
    };
    if local.is_empty() || host.is_empty() || tld.len() < 2 || domain.contains('@') {
        return Err(invalid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), UserStoreError> {
    if password.chars().count() < 6 {
        return Err(UserStoreError::InvalidField {
            field: "password",
            reason: "must be at least 6 characters",
        });
    }
    Ok(())
}
