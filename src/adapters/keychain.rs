//! Secret store adapters.
//!
//! | Adapter             | Backend                                        |
//! |---------------------|------------------------------------------------|
//! | `OsKeychain`        | macOS Keychain, Windows Credential Manager,    |
//! |                     | Linux kernel keyutils (via `keyring`)          |
//! | `MemorySecretStore` | in-process map, for tests and local tooling    |
//!
//! Entries are addressed as `(service, key)`; the key is the keyring
//! "user" slot. Values are returned exactly as enrolled.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::app::ports::{SecretStore, SecretStoreError};

// ── OS keychain ──────────────────────────────────────────────

/// Read-only view of the platform secret store.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeychain;

impl OsKeychain {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "os-keychain")]
impl SecretStore for OsKeychain {
    fn get(&self, service: &str, key: &str) -> Result<String, SecretStoreError> {
        let entry = keyring::Entry::new(service, key).map_err(map_keyring_error)?;
        let value = entry.get_password().map_err(map_keyring_error)?;
        debug!("OsKeychain: read '{}/{}'", service, key);
        Ok(value)
    }
}

#[cfg(feature = "os-keychain")]
fn map_keyring_error(e: keyring::Error) -> SecretStoreError {
    match e {
        keyring::Error::NoEntry => SecretStoreError::NotFound,
        keyring::Error::NoStorageAccess(_) => SecretStoreError::AccessDenied,
        other => SecretStoreError::Backend(other.to_string()),
    }
}

#[cfg(not(feature = "os-keychain"))]
impl SecretStore for OsKeychain {
    fn get(&self, service: &str, key: &str) -> Result<String, SecretStoreError> {
        debug!(
            "OsKeychain(stub): '{}/{}' requested without keychain support",
            service, key
        );
        Err(SecretStoreError::Backend(
            "built without the os-keychain feature".to_owned(),
        ))
    }
}

// ── In-memory store ──────────────────────────────────────────

type EntryKey = (String, String);

/// Map-backed [`SecretStore`]. Entries can also be marked as denied to
/// exercise permission failures.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<EntryKey, Result<String, SecretStoreError>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, service: &str, key: &str, value: &str) {
        self.set(service, key, Ok(value.to_owned()));
    }

    /// Make reads of `(service, key)` fail with [`SecretStoreError::AccessDenied`].
    pub fn deny(&self, service: &str, key: &str) {
        self.set(service, key, Err(SecretStoreError::AccessDenied));
    }

    pub fn remove(&self, service: &str, key: &str) {
        self.lock()
            .remove(&(service.to_owned(), key.to_owned()));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn set(&self, service: &str, key: &str, value: Result<String, SecretStoreError>) {
        self.lock()
            .insert((service.to_owned(), key.to_owned()), value);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<EntryKey, Result<String, SecretStoreError>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, key: &str) -> Result<String, SecretStoreError> {
        self.lock()
            .get(&(service.to_owned(), key.to_owned()))
            .cloned()
            .unwrap_or(Err(SecretStoreError::NotFound))
    }
}

// ── Tests ────────────────────────────────────────────────────
