use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// The environment variable holding the Resend API key.
pub const API_KEY_VAR: &str = "RESEND_API_KEY";

const TIMEOUT: Duration = Duration::from_secs(15);

/// A rendered email ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    /// Sender, in `Name <address>` form.
    pub from: String,
    /// Recipients.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Something that can deliver email.
pub trait Mailer {
    /// Send an email, returning the provider's message identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is not accepted for delivery.
    fn send(&self, email: &Email) -> Result<String, MailError>;
}

/// Errors raised while sending email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// No API key in the environment.
    #[error("RESEND_API_KEY is not set")]
    MissingApiKey,

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request could not be completed.
    #[error("request failed")]
    Request(#[from] reqwest::Error),

    /// The provider refused the email.
    #[error("email rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider.
        message: String,
    },
}

/// Sends email through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ResendMailer {
    /// Create a mailer posting to `endpoint` with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(MailError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a mailer using the API key from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set, or the HTTP client cannot
    /// be constructed.
    pub fn from_env(endpoint: impl Into<String>) -> Result<Self, MailError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(MailError::MissingApiKey)?;
        Self::new(endpoint, api_key)
    }
}

#[derive(Debug, Deserialize)]
struct Sent {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Rejection {
    #[serde(default)]
    message: String,
}

impl Mailer for ResendMailer {
    fn send(&self, email: &Email) -> Result<String, MailError> {
        tracing::debug!("Sending '{}' to {}", email.subject, email.to.join(", "));

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Rejection>()
                .map_or_else(|_| status.to_string(), |rejection| rejection.message);
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let sent: Sent = response.json()?;
        tracing::info!("Email sent: {}", sent.id);
        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_resend_payload() {
        let email = Email {
            from: "Spaced Revision <onboarding@resend.dev>".to_string(),
            to: vec!["alice@example.com".to_string()],
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: None,
        };

        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": "Spaced Revision <onboarding@resend.dev>",
                "to": ["alice@example.com"],
                "subject": "Hello",
                "html": "<p>Hi</p>",
            })
        );
    }

    #[test]
    fn decodes_rejection() {
        let rejection: Rejection =
            serde_json::from_str(r#"{"statusCode": 403, "message": "domain not verified"}"#)
                .unwrap();
        assert_eq!(rejection.message, "domain not verified");
    }
}
