//! Session Tokens
//!
//! Logged-in state is an explicit token-to-username map consulted on
//! every request, never a process-wide flag. Tokens are opaque UUIDs
//! carried in the `Authorization: Bearer` header.

use crate::ApiError;
use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-process session registry
#[derive(Default)]
pub struct SessionStore {
    tokens: RwLock<HashMap<Uuid, String>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for a logged-in user
    pub async fn issue(&self, username: &str) -> Uuid {
        let token = Uuid::new_v4();
        self.tokens
            .write()
            .await
            .insert(token, username.to_string());
        debug!(username, "issued session token");
        token
    }

    /// Drop a token; returns whether it existed
    pub async fn revoke(&self, token: &Uuid) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    /// Username holding `token`, if any
    pub async fn username_for(&self, token: &Uuid) -> Option<String> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Resolve the request's bearer token to a username
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let token = bearer_token(headers)?;
        self.username_for(&token)
            .await
            .ok_or(ApiError::Unauthorized)
    }
}

/// Parse the `Authorization: Bearer <uuid>` header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let token = value.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
    Uuid::parse_str(token.trim()).map_err(|_| ApiError::Unauthorized)
}
