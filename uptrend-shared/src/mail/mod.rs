/// Transactional email client
///
/// The notification gateway of the session subsystem. The contract is small:
/// send a verification code, a welcome note, a reset link, or a reset
/// confirmation. Delivery is best-effort: callers surface failures in logs
/// but never roll back a state transition that already committed (user
/// created, token issued).
///
/// Messages go out over the provider's HTTP JSON API (Mailtrap-compatible
/// `POST {api_url}/api/send` with a bearer token). No retries here; the
/// provider and the caller's logging are the recovery story.
///
/// # Example
///
/// ```no_run
/// use uptrend_shared::mail::{Mailer, MailerConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let mailer = Mailer::new(MailerConfig {
///     api_url: "https://send.api.mailtrap.io".to_string(),
///     api_token: "secret".to_string(),
///     sender_email: "no-reply@uptrend.shop".to_string(),
///     sender_name: "UpTrend".to_string(),
/// });
///
/// mailer.send_verification_email("alice@example.com", "123456").await?;
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use serde_json::json;

/// Error type for mail delivery
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Transport-level failure (connect, TLS, timeout)
    #[error("Failed to reach mail provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider rejected the request
    #[error("Mail provider returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Mail provider configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Base URL of the provider's send API
    pub api_url: String,

    /// Bearer token for the provider
    pub api_token: String,

    /// From address
    pub sender_email: String,

    /// From display name
    pub sender_name: String,
}

/// Address used in provider payloads
#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Transactional email client
///
/// Cheap to clone; wraps a shared `reqwest::Client`.
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    config: MailerConfig,
}

impl Mailer {
    /// Creates a new mailer
    pub fn new(config: MailerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Sends the signup verification code
    pub async fn send_verification_email(&self, to: &str, code: &str) -> Result<(), MailerError> {
        self.send(
            to,
            "Verify your email",
            format!(
                "Welcome to UpTrend! Your verification code is {code}. \
                 It expires in 24 hours."
            ),
            "Verification Email",
        )
        .await
    }

    /// Sends the post-verification welcome note
    pub async fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), MailerError> {
        self.send(
            to,
            "Welcome to UpTrend",
            format!("Hi {name}, your email is verified and your account is ready."),
            "Welcome Email",
        )
        .await
    }

    /// Sends the password reset link
    pub async fn send_password_reset_email(
        &self,
        to: &str,
        reset_url: &str,
    ) -> Result<(), MailerError> {
        self.send(
            to,
            "Reset your password",
            format!(
                "A password reset was requested for your account. \
                 Follow this link within the next hour: {reset_url}\n\
                 If you did not request this, you can ignore this email."
            ),
            "Reset Password",
        )
        .await
    }

    /// Confirms a completed password reset
    pub async fn send_password_reset_success(&self, to: &str) -> Result<(), MailerError> {
        self.send(
            to,
            "Password reset successfully",
            "Your UpTrend password was just changed. If this wasn't you, \
             contact support immediately."
                .to_string(),
            "Reset Password",
        )
        .await
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        text: String,
        category: &str,
    ) -> Result<(), MailerError> {
        let payload = json!({
            "from": Address {
                email: &self.config.sender_email,
                name: Some(&self.config.sender_name),
            },
            "to": [Address { email: to, name: None }],
            "subject": subject,
            "text": text,
            "category": category,
        });

        let response = self
            .http
            .post(format!("{}/api/send", self.config.api_url))
            .bearer_auth(&self.config.api_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected { status, body });
        }

        tracing::debug!(category, "Email accepted by provider");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_serialization() {
        let with_name = Address {
            email: "no-reply@uptrend.shop",
            name: Some("UpTrend"),
        };
        let json = serde_json::to_value(&with_name).unwrap();
        assert_eq!(json["email"], "no-reply@uptrend.shop");
        assert_eq!(json["name"], "UpTrend");

        let without_name = Address {
            email: "alice@example.com",
            name: None,
        };
        let json = serde_json::to_value(&without_name).unwrap();
        assert!(json.get("name").is_none());
    }
}
