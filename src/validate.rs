//! Field validation for form submissions.
//!
//! Checks run after admission, so a rejected payload has already consumed
//! quota. Bounds are generous for humans and tight enough to keep junk out of
//! the notification inbox.

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_FIELD_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;

// Deliberately loose: one @, no whitespace, a dot in the domain. Real
// verification happens when someone replies.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A single field that failed validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl FieldError {
    fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Requires a non-empty trimmed value of at most `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    if value.chars().count() > max {
        return Err(FieldError::new(field, "is too long"));
    }
    Ok(())
}

/// Length ceiling for an optional field; absent or empty is fine.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), FieldError> {
    match value {
        Some(v) if v.chars().count() > max => Err(FieldError::new(field, "is too long")),
        _ => Ok(()),
    }
}

/// Requires a plausible email address.
pub fn email(field: &'static str, value: &str) -> Result<(), FieldError> {
    required_text(field, value, MAX_EMAIL_LEN)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(FieldError::new(field, "is not a valid email address"));
    }
    Ok(())
}

/// Optional http(s) URL, e.g. a portfolio link.
pub fn optional_url(field: &'static str, value: Option<&str>) -> Result<(), FieldError> {
    let Some(value) = value else { return Ok(()) };
    if value.trim().is_empty() {
        return Ok(());
    }
    match url::Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(FieldError::new(field, "is not a valid http(s) URL")),
    }
}
