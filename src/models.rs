//! Records exchanged with the backend
//!
//! Field names follow the backend's camelCase JSON. The backend serializes
//! missing values as `null`, so plain string and number fields read `null`
//! as their default.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps as well as the zone-less form the backend
/// emits for local date-times.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.naive_utc()));
    }
    raw.parse::<NaiveDateTime>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Account role, as named by the backend. Auth replies call customers
/// `USER`; the name is kept so a user can be written back unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Customer,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// `CUSTOMER` and `USER` are the same kind of account
    pub fn is_customer(self) -> bool {
        matches!(self, Role::Customer | Role::User)
    }
}

/// Training plan difficulty. The backend stores free text, so anything
/// outside the three known levels is kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Other(raw) => raw,
        }
    }
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Beginner" | "beginner" => Difficulty::Beginner,
            "Intermediate" | "intermediate" => Difficulty::Intermediate,
            "Advanced" | "advanced" => Difficulty::Advanced,
            _ => Difficulty::Other(raw),
        }
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A gym trainer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "null_default")]
    pub name: String,

    /// Comma-separated tags, e.g. `"Yoga, Pilates"`
    #[serde(default, deserialize_with = "null_default")]
    pub specialization: String,

    /// Years of experience
    #[serde(default, deserialize_with = "null_default")]
    pub experience: i32,

    #[serde(default, deserialize_with = "null_default")]
    pub email: String,

    #[serde(default, deserialize_with = "null_default")]
    pub phone: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Device-local photo. Read from the backend when it reports one, but
    /// never written to it.
    #[serde(default, skip_serializing)]
    pub photo: Option<String>,
}

impl Trainer {
    /// Specialization tags, trimmed, empty entries dropped
    pub fn specializations(&self) -> impl Iterator<Item = &str> {
        self.specialization
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

/// A membership plan on sale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "null_default")]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,

    #[serde(default, deserialize_with = "null_default")]
    pub duration_months: i32,
}

/// A training plan, optionally led by a trainer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "null_default")]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Free text such as `"8 weeks"`
    #[serde(default, deserialize_with = "null_default")]
    pub duration: String,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub trainer_id: Option<i64>,
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    #[serde(default, deserialize_with = "null_default")]
    pub username: String,

    #[serde(default, deserialize_with = "null_default")]
    pub email: String,

    #[serde(default, deserialize_with = "null_default")]
    pub phone: String,

    #[serde(default, deserialize_with = "null_default")]
    pub role: Role,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// A user's membership, with an optional training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,

    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub membership_plan: Option<MembershipPlan>,

    #[serde(default)]
    pub plan: Option<TrainingPlan>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}
