//! Registration and Login Routes

use crate::session::bearer_token;
use crate::{ApiError, SharedState};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Whether the welcome email went out; the account exists either way
    pub email_sent: bool,
}

/// Create a new account
pub async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let record = state
        .users
        .register(&body.username, &body.email, &body.password)
        .await?;

    // The record is already persisted; a notification failure is reported,
    // never rolled back.
    let email_sent = match state
        .notifier
        .send_welcome(&record.email, &record.username)
        .await
    {
        Ok(sent) => sent,
        Err(err) => {
            warn!(username = %record.username, error = %err, "welcome email failed");
            false
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: record.username,
            email: record.email,
            created_at: record.created_at,
            email_sent,
        }),
    ))
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub username: String,
}

/// Check credentials and issue a session token
pub async fn login(
    State(state): State<SharedState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let record = state.users.login(&body.username, &body.password).await?;
    let token = state.sessions.issue(&record.username).await;

    Ok(Json(LoginResponse {
        token,
        username: record.username,
    }))
}

/// Revoke the caller's session token
pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    if !state.sessions.revoke(&token).await {
        return Err(ApiError::Unauthorized);
    }
    Ok(StatusCode::NO_CONTENT)
}
