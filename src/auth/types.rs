//! Types for authentication and session checks

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Role;

/// Username/password pair for login
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Sign-up form
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub full_name: Option<String>,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl Registration {
    /// Username sent to the backend: the full name without whitespace,
    /// lower-cased, or the local part of the email when no name was given.
    pub fn username(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterBody<'a> {
    pub username: String,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
}

/// Account created by a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// The user object returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
}

/// Current session as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(rename = "user")]
    pub username: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Outcome carried in the `msg` field of auth replies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "msg")]
pub enum AuthReply {
    #[serde(rename = "logged-in")]
    LoggedIn { user: SessionUser },
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "logged out")]
    LoggedOut,
    #[serde(other)]
    Unrecognized,
}

impl AuthReply {
    /// Decode a reply body. A body without a `msg` string is
    /// [`AuthReply::Unrecognized`]; a known `msg` with a malformed payload is
    /// a decode error.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.get("msg").and_then(Value::as_str).is_none() {
            return Ok(AuthReply::Unrecognized);
        }
        serde_json::from_value(value).map_err(Error::decode)
    }
}
