//! Outbound notification dispatch via an HTTP mail API.
//!
//! Submissions are forwarded as plain-text mail through a JSON mail API
//! (bearer-token auth). With no endpoint configured the mailer logs the
//! message and reports success; local development and the integration tests
//! run in that mode.

use std::sync::Arc;

use url::Url;

/// Mail delivery failure. Surfaced to clients as a 502, never a panic.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("mail API returned {0}")]
    Status(reqwest::StatusCode),
}

/// A notification ready for dispatch. Plain text only; no template
/// rendering happens here.
#[derive(Debug, Clone)]
pub struct OutboundMail {
    pub subject: String,
    /// Submitter's address, so replies go straight back to them.
    pub reply_to: Option<String>,
    pub text: String,
}

/// Cheap-clone handle to the mail client.
#[derive(Clone)]
pub struct Mailer {
    inner: Arc<MailerInner>,
}

struct MailerInner {
    client: reqwest::Client,
    outbound: Option<Outbound>,
}

struct Outbound {
    endpoint: Url,
    token: Option<String>,
    from: String,
    to: String,
}

impl Mailer {
    /// Creates a mailer. `endpoint = None` disables delivery (log-only mode).
    pub fn new(endpoint: Option<Url>, token: Option<String>, from: String, to: String) -> Self {
        let outbound = endpoint.map(|endpoint| Outbound {
            endpoint,
            token,
            from,
            to,
        });
        Self {
            inner: Arc::new(MailerInner {
                client: reqwest::Client::new(),
                outbound,
            }),
        }
    }

    /// Creates a log-only mailer (tests, local development).
    pub fn disabled() -> Self {
        Self::new(None, None, String::new(), String::new())
    }

    /// Whether a mail API endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.inner.outbound.is_some()
    }

    /// Delivers a notification, or logs it in log-only mode.
    pub async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        let Some(out) = &self.inner.outbound else {
            tracing::info!(subject = %mail.subject, "mail delivery disabled; logging submission");
            tracing::debug!(text = %mail.text, "submission body");
            return Ok(());
        };

        let payload = serde_json::json!({
            "from": out.from,
            "to": [out.to],
            "reply_to": mail.reply_to,
            "subject": mail.subject,
            "text": mail.text,
        });

        let mut request = self.inner.client.post(out.endpoint.clone()).json(&payload);
        if let Some(token) = &out.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Status(response.status()));
        }

        tracing::info!(subject = %mail.subject, "notification delivered");
        Ok(())
    }
}
