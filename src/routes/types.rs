//! Request and response payloads for the form API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::mailer::OutboundMail;
use crate::validate::{self, FieldError, MAX_FIELD_LEN, MAX_MESSAGE_LEN, MAX_NAME_LEN};

/// Contact form submission from the website.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Service line the enquiry is about (e.g. "cloud-platforms").
    #[serde(default)]
    pub service: Option<String>,
    /// Free-form budget bracket selected in the form.
    #[serde(default)]
    pub budget: Option<String>,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate::required_text("name", &self.name, MAX_NAME_LEN)?;
        validate::email("email", &self.email)?;
        validate::optional_text("company", self.company.as_deref(), MAX_FIELD_LEN)?;
        validate::optional_text("phone", self.phone.as_deref(), MAX_FIELD_LEN)?;
        validate::optional_text("service", self.service.as_deref(), MAX_FIELD_LEN)?;
        validate::optional_text("budget", self.budget.as_deref(), MAX_FIELD_LEN)?;
        validate::required_text("message", &self.message, MAX_MESSAGE_LEN)?;
        Ok(())
    }

    pub fn to_mail(&self) -> OutboundMail {
        let mut lines = vec![
            format!("Name: {}", self.name.trim()),
            format!("Email: {}", self.email.trim()),
        ];
        push_field(&mut lines, "Company", self.company.as_deref());
        push_field(&mut lines, "Phone", self.phone.as_deref());
        push_field(&mut lines, "Service", self.service.as_deref());
        push_field(&mut lines, "Budget", self.budget.as_deref());
        lines.push(String::new());
        lines.push(self.message.trim().to_string());

        OutboundMail {
            subject: format!("Website enquiry from {}", self.name.trim()),
            reply_to: Some(self.email.trim().to_string()),
            text: lines.join("\n"),
        }
    }
}

/// Job application submission from the careers page.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApplicationRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Role being applied for, as listed on the careers page.
    pub position: String,
    /// Portfolio / GitHub / LinkedIn URL.
    #[serde(default)]
    pub portfolio: Option<String>,
    pub cover_letter: String,
}

impl ApplicationRequest {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate::required_text("name", &self.name, MAX_NAME_LEN)?;
        validate::email("email", &self.email)?;
        validate::optional_text("phone", self.phone.as_deref(), MAX_FIELD_LEN)?;
        validate::required_text("position", &self.position, MAX_FIELD_LEN)?;
        validate::optional_url("portfolio", self.portfolio.as_deref())?;
        validate::required_text("cover_letter", &self.cover_letter, MAX_MESSAGE_LEN)?;
        Ok(())
    }

    pub fn to_mail(&self) -> OutboundMail {
        let mut lines = vec![
            format!("Name: {}", self.name.trim()),
            format!("Email: {}", self.email.trim()),
            format!("Position: {}", self.position.trim()),
        ];
        push_field(&mut lines, "Phone", self.phone.as_deref());
        push_field(&mut lines, "Portfolio", self.portfolio.as_deref());
        lines.push(String::new());
        lines.push(self.cover_letter.trim().to_string());

        OutboundMail {
            subject: format!(
                "Application for {} from {}",
                self.position.trim(),
                self.name.trim()
            ),
            reply_to: Some(self.email.trim().to_string()),
            text: lines.join("\n"),
        }
    }
}

fn push_field(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        lines.push(format!("{label}: {value}"));
    }
}

/// Returned for an admitted, validated, dispatched submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    /// Always "accepted".
    pub status: String,
}

impl SubmissionResponse {
    pub fn accepted() -> Self {
        Self {
            status: "accepted".to_string(),
        }
    }
}

/// Server health report.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether outbound mail is configured (false = log-only mode).
    pub mail_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactRequest {
        ContactRequest {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            company: Some("Analytical Engines Ltd".into()),
            phone: None,
            service: None,
            budget: None,
            message: "We need help scaling our difference engine.".into(),
        }
    }

    #[test]
    fn valid_contact_passes() {
        assert!(contact().validate().is_ok());
    }

    #[test]
    fn contact_requires_message_and_valid_email() {
        let mut req = contact();
        req.message = "  ".into();
        assert_eq!(req.validate().unwrap_err().field, "message");

        let mut req = contact();
        req.email = "not-an-email".into();
        assert_eq!(req.validate().unwrap_err().field, "email");
    }

    #[test]
    fn contact_mail_omits_empty_optionals() {
        let mut req = contact();
        req.phone = Some("   ".into());
        let mail = req.to_mail();

        assert_eq!(mail.subject, "Website enquiry from Ada Lovelace");
        assert_eq!(mail.reply_to.as_deref(), Some("ada@example.com"));
        assert!(mail.text.contains("Company: Analytical Engines Ltd"));
        assert!(!mail.text.contains("Phone:"));
        assert!(mail.text.ends_with("We need help scaling our difference engine."));
    }

    #[test]
    fn application_requires_position_and_checks_portfolio_url() {
        let mut req = ApplicationRequest {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            phone: None,
            position: "Senior Rust Engineer".into(),
            portfolio: Some("https://github.com/grace".into()),
            cover_letter: "I wrote the first compiler.".into(),
        };
        assert!(req.validate().is_ok());

        req.portfolio = Some("javascript:alert(1)".into());
        assert_eq!(req.validate().unwrap_err().field, "portfolio");

        req.portfolio = None;
        req.position = String::new();
        assert_eq!(req.validate().unwrap_err().field, "position");
    }
}
