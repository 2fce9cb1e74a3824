//! Device-local storage for the Fitness Sharks client
//!
//! This crate keeps the data that never reaches the backend: trainer photos,
//! contact-form messages and career applications. Values live in a
//! [`KeyValueStore`] under well-known keys and are wrapped in a versioned
//! envelope so the layout can evolve.

mod backend;
mod types;

pub mod applications;
pub mod messages;
pub mod photos;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub use applications::ApplicationStore;
pub use backend::{FileStore, MemoryStore};
pub use messages::MessageStore;
pub use photos::PhotoStore;
pub use types::*;

/// Key holding the trainer id → photo map
pub const TRAINER_PHOTOS_KEY: &str = "trainerPhotos";
/// Key holding the contact message list, newest first
pub const CONTACT_MESSAGES_KEY: &str = "contactMessages";
/// Key holding the career application list, oldest first
pub const CAREER_APPLICATIONS_KEY: &str = "careerApplications";

/// Envelope version written by this crate. Bare values without an envelope
/// are read as version 0.
pub const SCHEMA_VERSION: u64 = 1;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised by the device-local store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Unsupported schema version {found} under key {key}")]
    UnsupportedVersion { key: String, found: u64 },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Backend skipped the update of {0}")]
    NotUpdated(String),

    #[error("Invalid form: {0}")]
    Validation(FieldErrors),
}

/// Minimal string key/value persistence, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Read-modify-write under the backend's write lock. `f` receives the
    /// current value and returns its replacement, or `None` to leave it as is.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<Option<String>>,
    ) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<Option<String>>,
    ) -> Result<()> {
        (**self).update(key, f)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<Option<String>>,
    ) -> Result<()> {
        (**self).update(key, f)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u64,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u64,
    data: Value,
}

/// Read a typed value, returning `T::default()` when the key is absent.
pub fn load<S, T>(store: &S, key: &str) -> Result<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    decode(key, store.get(key)?.as_deref())
}

/// Write a typed value inside the current envelope version.
pub fn save<S, T>(store: &S, key: &str, data: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    store.set(key, &encode(data)?)
}

/// Change a typed value in place while holding the backend's write lock,
/// then write it back. Returns whatever `f` returns.
pub fn modify<S, T, R, F>(store: &S, key: &str, f: F) -> Result<R>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + DeserializeOwned + Default,
    F: FnOnce(&mut T) -> R,
{
    let mut f = Some(f);
    let mut outcome = None;

    store.update(key, &mut |raw| {
        let Some(f) = f.take() else {
            return Ok(None);
        };
        let mut data: T = decode(key, raw)?;
        outcome = Some(f(&mut data));
        Ok(Some(encode(&data)?))
    })?;

    outcome.ok_or_else(|| StorageError::NotUpdated(key.to_string()))
}

fn decode<T>(key: &str, raw: Option<&str>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(T::default()),
    };

    let value: Value = serde_json::from_str(raw)?;
    let data = if is_envelope(&value) {
        let envelope: Envelope = serde_json::from_value(value)?;
        if envelope.version > SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                key: key.to_string(),
                found: envelope.version,
            });
        }
        envelope.data
    } else {
        log::debug!("reading legacy value under {}", key);
        value
    };

    Ok(serde_json::from_value(data)?)
}

fn encode<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        data,
    })?)
}

fn is_envelope(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.len() == 2 && map.get("version").map_or(false, Value::is_u64) && map.contains_key("data")
        }
        _ => false,
    }
}
