use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chama_core::errors::Error;
use chama_core::secrets::{format_service_id, SecretStore};
use chama_core::Result;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const CURRENT_VERSION: u32 = 1;

/// Secrets persisted as a small JSON document, created on first write.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct StoredSecrets {
    version: u32,
    secrets: HashMap<String, String>,
}

fn secret_err(e: impl std::fmt::Display) -> Error {
    Error::Secret(e.to_string())
}

impl FileSecretStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn with_store<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::Secret("Secret store lock poisoned".into()))?;
        // An unreadable file is replaced rather than blocking every write.
        let mut store = match self.load_store_locked() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    "Discarding unreadable token file {}: {}",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        };
        op(&mut store);
        self.persist_store_locked(store)
    }

    fn read_store(&self) -> Result<HashMap<String, String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::Secret("Secret store lock poisoned".into()))?;
        self.load_store_locked()
    }

    fn load_store_locked(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read(&self.path).map_err(secret_err)?;
        if raw.is_empty() {
            return Ok(HashMap::new());
        }

        let stored: StoredSecrets = serde_json::from_slice(&raw).map_err(secret_err)?;
        Ok(stored.secrets)
    }

    /// Writes a private temp file next to the target, then renames it over.
    fn persist_store_locked(&self, secrets: HashMap<String, String>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(secret_err)?;

        let stored = StoredSecrets {
            version: CURRENT_VERSION,
            secrets,
        };
        let json = serde_json::to_vec_pretty(&stored).map_err(secret_err)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(secret_err)?;
        restrict_permissions(tmp.path())?;
        tmp.write_all(&json).map_err(secret_err)?;
        tmp.as_file().sync_all().map_err(secret_err)?;
        tmp.persist(&self.path).map_err(|e| secret_err(e.error))?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(secret_err)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl SecretStore for FileSecretStore {
    fn set_secret(&self, service: &str, secret: &str) -> Result<()> {
        let key = format_service_id(service);
        self.with_store(|store| {
            store.insert(key, secret.to_string());
        })
    }

    fn get_secret(&self, service: &str) -> Result<Option<String>> {
        let store = self.read_store()?;
        Ok(store.get(&format_service_id(service)).cloned())
    }

    fn delete_secret(&self, service: &str) -> Result<()> {
        let key = format_service_id(service);
        self.with_store(|store| {
            store.remove(&key);
        })
    }
}
