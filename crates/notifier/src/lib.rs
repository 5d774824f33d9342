//! Registration Notifier
//!
//! Sends a welcome email over SMTP when an account is created. Sending is
//! best-effort by contract: the caller treats a failure as non-fatal and
//! never rolls back the registration. When no SMTP block is configured the
//! notifier runs disabled and every send is a no-op.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// SMTP settings. The username and password arrive through the
/// environment-backed configuration layer, never from source literals.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sender address, e.g. "RiskCast <no-reply@riskcast.example>"
    pub from: String,
    pub username: String,
    pub password: String,
}

fn default_port() -> u16 {
    587
}

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Welcome-email sender
pub struct Notifier {
    inner: Option<Inner>,
}

struct Inner {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Notifier {
    /// A notifier that silently drops every send
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Build a STARTTLS SMTP notifier from configuration
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = config.from.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        info!(host = %config.host, port = config.port, "smtp notifier configured");
        Ok(Self {
            inner: Some(Inner { transport, from }),
        })
    }

    /// Whether sends will actually go out
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Send the welcome message. Returns `Ok(false)` when the notifier is
    /// disabled, `Ok(true)` when the message was accepted by the relay.
    pub async fn send_welcome(&self, to: &str, username: &str) -> Result<bool, NotifyError> {
        let Some(inner) = &self.inner else {
            debug!(to, "notifier disabled, skipping welcome email");
            return Ok(false);
        };

        let message = Message::builder()
            .from(inner.from.clone())
            .to(to.parse()?)
            .subject("Welcome to RiskCast")
            .body(format!(
                "Dear {username},\n\n\
                 Thank you for registering with us!\n\
                 Your account has been successfully created.\n\n\
                 Best regards,\n\
                 The RiskCast Team\n"
            ))?;

        inner.transport.send(message).await?;
        info!(to, "sent welcome email");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_notifier_skips_send() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_enabled());

        let sent = notifier.send_welcome("alice@example.com", "alice").await;
        assert!(!sent.unwrap());
    }

    #[test]
    fn test_invalid_sender_address_rejected() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            from: "not an address".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        assert!(matches!(
            Notifier::from_config(&config),
            Err(NotifyError::Address(_))
        ));
    }

    #[test]
    fn test_smtp_config_defaults_port() {
        let config: SmtpConfig = serde_json::from_str(
            r#"{"host":"smtp.example.com","from":"a@b.co","username":"u","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(config.port, 587);
    }
}
