//! Explorer configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields the stock explorer:
//!
//! ```toml
//! seed = 42
//! credential_env = "GEMINI_API_KEY"
//! credential_file = ".cosmiclens/credentials.json"
//! offline_latency_ms = 0
//!
//! [scene]
//! columns = 8
//! rows = 5
//! occupancy = 0.9
//! padding = 0.15
//!
//! [provider]
//! model = "gemini-2.5-flash"
//! base_url = "https://generativelanguage.googleapis.com"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cosmiclens_logic::archive::{ArchiveError, OfflineArchive};
use cosmiclens_logic::scene::SceneParams;
use serde::{Deserialize, Serialize};

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_CREDENTIAL_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_CREDENTIAL_FILE: &str = ".cosmiclens/credentials.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Remote provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    pub base_url: String,
    /// Request timeout. None leaves it to the transport.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Top-level explorer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub scene: SceneParams,
    pub provider: ProviderConfig,
    /// Artificial delay before offline answers, in milliseconds.
    pub offline_latency_ms: u64,
    /// Environment variable consulted first for the API key.
    pub credential_env: String,
    /// Where a saved API key is kept.
    pub credential_file: PathBuf,
    /// Optional JSON archive layered over the built-in one.
    pub archive_path: Option<PathBuf>,
    /// Scene seed. None draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            scene: SceneParams::default(),
            provider: ProviderConfig::default(),
            offline_latency_ms: 800,
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
            credential_file: PathBuf::from(DEFAULT_CREDENTIAL_FILE),
            archive_path: None,
            seed: None,
        }
    }
}

impl ExplorerConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scene = &self.scene;
        if !(0.0..=1.0).contains(&scene.occupancy) {
            return Err(ConfigError::Invalid(format!(
                "scene.occupancy must be within 0..=1, got {}",
                scene.occupancy
            )));
        }
        if !(scene.padding > 0.0 && scene.padding < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "scene.padding must be greater than 0 and below 0.5, got {}",
                scene.padding
            )));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.model is empty".to_string()));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url is empty".to_string()));
        }
        if self.credential_env.trim().is_empty() {
            return Err(ConfigError::Invalid("credential_env is empty".to_string()));
        }
        Ok(())
    }

    pub fn offline_latency(&self) -> Duration {
        Duration::from_millis(self.offline_latency_ms)
    }

    /// Built-in archive, with `archive_path` merged over it when set.
    pub fn archive(&self) -> Result<OfflineArchive, ConfigError> {
        let Some(path) = &self.archive_path else {
            return Ok(OfflineArchive::builtin());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let archive = OfflineArchive::builtin_with_json(&raw)?;
        log::info!("Loaded offline archive overlay from {}", path.display());
        Ok(archive)
    }
}
