//! Provider credential stores.
//!
//! The resolver only ever calls [`CredentialStore::read`], once per
//! resolution, so a write or clear takes effect on the next lookup without
//! any reload step.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Minimum trimmed length accepted when saving a new key.
pub const MIN_KEY_LEN: usize = 11;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("credential file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API key rejected: must be at least 11 characters")]
    Implausible,
    #[error("credential source '{0}' is read-only")]
    ReadOnly(String),
}

/// Where the API key lives.
pub trait CredentialStore {
    /// Current key, if any. Implausible values are reported as absent.
    fn read(&self) -> Option<String>;
    fn write(&mut self, key: &str) -> Result<(), CredentialError>;
    fn clear(&mut self) -> Result<(), CredentialError>;
}

/// A key is usable when it is non-empty after trimming and not a stringified
/// `undefined` left behind by a misconfigured environment.
pub fn is_plausible(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != "undefined"
}

/// Trim a key for saving, rejecting anything too short to be real.
pub fn prepare_for_write(key: &str) -> Result<String, CredentialError> {
    let key = key.trim();
    if key.chars().count() < MIN_KEY_LEN || !is_plausible(key) {
        return Err(CredentialError::Implausible);
    }
    Ok(key.to_string())
}

fn usable(raw: Option<String>) -> Option<String> {
    raw.filter(|k| is_plausible(k))
        .map(|k| k.trim().to_string())
}

// ── In-memory ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryCredentials {
    key: Option<String>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `key` as-is, without the write-time length check.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn read(&self) -> Option<String> {
        usable(self.key.clone())
    }

    fn write(&mut self, key: &str) -> Result<(), CredentialError> {
        self.key = Some(prepare_for_write(key)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        self.key = None;
        Ok(())
    }
}

// ── Environment ─────────────────────────────────────────────────────────

/// Read-only key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialStore for EnvCredentials {
    fn read(&self) -> Option<String> {
        usable(std::env::var(&self.var).ok())
    }

    fn write(&mut self, _key: &str) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly(self.var.clone()))
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly(self.var.clone()))
    }
}

// ── File ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    api_key: String,
}

/// Key persisted as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<String>, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: CredentialFile = serde_json::from_str(&raw)?;
        Ok(Some(file.api_key))
    }
}

impl CredentialStore for FileCredentials {
    fn read(&self) -> Option<String> {
        match self.load() {
            Ok(key) => usable(key),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable credential file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn write(&mut self, key: &str) -> Result<(), CredentialError> {
        let api_key = prepare_for_write(key)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&CredentialFile { api_key })?;
        fs::write(&self.path, json)?;
        log::info!("Saved API key to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Removed API key at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Layered ─────────────────────────────────────────────────────────────

/// Which layer supplied the active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Store,
}

/// Environment variable first, then a writable store.
///
/// Writes and clears go to the store; a key set in the environment keeps
/// taking precedence.
#[derive(Debug, Clone)]
pub struct LayeredCredentials<S> {
    env: EnvCredentials,
    store: S,
}

impl<S: CredentialStore> LayeredCredentials<S> {
    pub fn new(env: EnvCredentials, store: S) -> Self {
        Self { env, store }
    }

    pub fn active_source(&self) -> Option<KeySource> {
        if self.env.read().is_some() {
            Some(KeySource::Environment)
        } else if self.store.read().is_some() {
            Some(KeySource::Store)
        } else {
            None
        }
    }

    pub fn env(&self) -> &EnvCredentials {
        &self.env
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: CredentialStore> CredentialStore for LayeredCredentials<S> {
    fn read(&self) -> Option<String> {
        self.env.read().or_else(|| self.store.read())
    }

    fn write(&mut self, key: &str) -> Result<(), CredentialError> {
        self.store.write(key)
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        self.store.clear()
    }
}
