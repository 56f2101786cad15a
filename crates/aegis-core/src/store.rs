// ── External configuration and secret stores ──
//
// The dashboard's settings live outside the process and may change between
// requests, so nothing here caches: every accessor reads through to the
// backing store. Secrets are looked up by *name*; integration documents only
// ever carry the name of the variable holding a credential.

use std::collections::HashMap;
use std::sync::RwLock;

use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;

/// Document key of the ServiceNow integration config.
pub const SERVICENOW_KEY: &str = "servicenow";
/// Document key of the SolarWinds integration config.
pub const SOLARWINDS_KEY: &str = "solarwinds";
/// Document key of the vendor probe list.
pub const VENDORS_KEY: &str = "vendors";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),

    #[error("value for {key} is not a string")]
    NotAString { key: String },

    #[error("malformed document {key}: {message}")]
    Malformed { key: String, message: String },
}

/// Mutable key/value configuration, read fresh on every call.
pub trait ConfigStore: Send + Sync {
    /// Read a string-typed setting.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read a structured document (integration config, vendor list).
    fn document(&self, key: &str) -> Result<Option<Value>, StoreError>;
}

/// Resolves credential values by variable name.
pub trait SecretStore: Send + Sync {
    fn secret(&self, name: &str) -> Option<SecretString>;
}

// ── In-memory implementations ────────────────────────────────────────

/// Process-local `ConfigStore`; values may be replaced at any time.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.read(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(StoreError::NotAString { key: key.to_owned() }),
        }
    }

    fn document(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key)
    }
}

/// Process-local `SecretStore`.
#[derive(Debug, Default)]
pub struct MemorySecrets {
    values: RwLock<HashMap<String, SecretString>>,
}

impl MemorySecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.into(), SecretString::from(value.into()));
        }
    }
}

impl SecretStore for MemorySecrets {
    fn secret(&self, name: &str) -> Option<SecretString> {
        self.values.read().ok()?.get(name).cloned()
    }
}
