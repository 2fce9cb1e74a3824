//! Records kept in device-local storage

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// `x@y.z` somewhere in the value, no whitespace inside
static EMAIL_SHAPE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

/// Read state of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
}

/// Priority assigned on submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
}

/// Contact-form input as typed by the visitor
#[derive(Debug, Clone, Default, Validate)]
pub struct ContactForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub subject: String,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

/// A stored contact message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
    pub priority: Priority,
}

/// Review state of a career application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

/// File metadata for an uploaded resume or portfolio. Only the metadata is
/// kept, never the file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Career application input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(custom(function = "email_shape"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    pub address: String,
    #[validate(custom(function = "not_blank"))]
    pub position: String,
    #[validate(custom(function = "not_blank"))]
    pub experience: String,
    #[validate(custom(function = "not_blank"))]
    pub education: String,
    pub skills: String,
    #[validate(custom(function = "not_blank"))]
    pub cover_letter: String,
    pub availability: String,
    pub expected_salary: String,
    pub references: String,
    pub resume: Option<Attachment>,
    pub portfolio: Option<Attachment>,
}

/// A stored career application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerApplication {
    pub id: i64,
    #[serde(flatten)]
    pub form: ApplicationForm,
    pub job_id: Option<String>,
    pub job_title: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}

/// Per-field validation failures, keyed by the form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every failing field from `errors`, keyed by its camelCase
    /// name. `describe` turns the field and the failure code into the message.
    pub(crate) fn from_validation<F>(errors: &ValidationErrors, describe: F) -> Self
    where
        F: Fn(&str, &str) -> String,
    {
        let mut collected = Self::new();
        for (field, failures) in errors.field_errors() {
            let code = failures.first().map_or("invalid", |e| e.code.as_ref());
            let field = camel_case(&field);
            let message = describe(&field, code);
            collected.add(&field, &message);
        }
        collected
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Next record id: the current time in milliseconds, bumped past the largest
/// existing id so two submissions in the same millisecond stay distinct.
pub(crate) fn next_id(now: DateTime<Utc>, existing: impl Iterator<Item = i64>) -> i64 {
    let now = now.timestamp_millis();
    match existing.max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Rejects empty and whitespace-only input
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn email_shape(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    match EMAIL_SHAPE.as_ref() {
        Some(shape) if shape.is_match(value) => Ok(()),
        _ => Err(ValidationError::new("email")),
    }
}

fn camel_case(field: &str) -> String {
    let mut parts = field.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
