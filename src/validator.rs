//! Contact-form field validation.
//!
//! Pure and deterministic: normalization trims and caps each field, and
//! validation only inspects the normalized values. The email check is
//! syntactic, no DNS or mailbox verification.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 254;
pub const SUBJECT_MAX: usize = 200;
pub const BODY_MAX: usize = 2000;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

/// The four submission fields after trimming and length-capping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

impl ContactFields {
    pub fn normalize(name: &str, email: &str, subject: &str, body: &str) -> Self {
        Self {
            name: cap(name, NAME_MAX),
            email: cap(email, EMAIL_MAX),
            subject: cap(subject, SUBJECT_MAX),
            body: cap(body, BODY_MAX),
        }
    }
}

// Caps by character count, not bytes, so multi-byte input never splits.
fn cap(raw: &str, max: usize) -> String {
    raw.trim().chars().take(max).collect()
}

pub fn validate(fields: &ContactFields) -> Result<(), AppError> {
    if fields.name.is_empty()
        || fields.email.is_empty()
        || fields.subject.is_empty()
        || fields.body.is_empty()
    {
        return Err(AppError::MissingField);
    }

    if !EMAIL_RE.is_match(&fields.email) {
        return Err(AppError::InvalidEmail);
    }

    Ok(())
}
