//! Persisted client secrets (the bearer token).
//!
//! Stores are injected so the same session logic runs against a file on the
//! terminal client and an in-memory map in tests.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{Error, Result};

const SERVICE_PREFIX: &str = "chama";

/// Namespaces a secret key so several apps can share one backing store.
pub fn format_service_id(service: &str) -> String {
    format!("{}_{}", SERVICE_PREFIX, service)
}

/// Key/value storage for secrets.
pub trait SecretStore: Send + Sync {
    fn set_secret(&self, service: &str, secret: &str) -> Result<()>;
    fn get_secret(&self, service: &str) -> Result<Option<String>>;
    fn delete_secret(&self, service: &str) -> Result<()>;
}

/// Secret store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one secret.
    pub fn with_secret(service: &str, secret: &str) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.secrets.write() {
            map.insert(format_service_id(service), secret.to_string());
        }
        store
    }
}

impl SecretStore for MemorySecretStore {
    fn set_secret(&self, service: &str, secret: &str) -> Result<()> {
        self.secrets
            .write()
            .map_err(|_| Error::Secret("Secret store lock poisoned".into()))?
            .insert(format_service_id(service), secret.to_string());
        Ok(())
    }

    fn get_secret(&self, service: &str) -> Result<Option<String>> {
        Ok(self
            .secrets
            .read()
            .map_err(|_| Error::Secret("Secret store lock poisoned".into()))?
            .get(&format_service_id(service))
            .cloned())
    }

    fn delete_secret(&self, service: &str) -> Result<()> {
        self.secrets
            .write()
            .map_err(|_| Error::Secret("Secret store lock poisoned".into()))?
            .remove(&format_service_id(service));
        Ok(())
    }
}
