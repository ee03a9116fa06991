//! CosmicLens explorer runtime.
//!
//! Builds on `cosmiclens-logic` with the parts that touch the outside world:
//! the credential store, the generative-AI provider, configuration files and
//! the async fact resolution policy.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | `ExplorerConfig` loaded from TOML |
//! | [`credentials`] | API key stores (memory, env, file, layered) |
//! | [`explorer`] | Session state: scene, viewport, detail panel |
//! | [`gemini`] | Gemini REST client |
//! | [`provider`] | `FactProvider` trait and request/response types |
//! | [`resolver`] | Offline/remote fact resolution |

pub mod config;
pub mod credentials;
pub mod explorer;
pub mod gemini;
pub mod provider;
pub mod resolver;

pub use config::{ConfigError, ExplorerConfig, ProviderConfig};
pub use credentials::{
    CredentialError, CredentialStore, EnvCredentials, FileCredentials, KeySource,
    LayeredCredentials, MemoryCredentials,
};
pub use explorer::{DetailPanel, Explorer, Subject, Ticket, ViewState};
pub use gemini::GeminiClient;
pub use provider::{Citation, FactProvider, GenerateRequest, GenerateResponse, ProviderError};
pub use resolver::FactResolver;

/// Resolver wired the way the CLI runs it: Gemini over HTTP, key from the
/// environment or the credential file.
pub type DefaultResolver = FactResolver<GeminiClient, LayeredCredentials<FileCredentials>>;

pub type DefaultExplorer = Explorer<GeminiClient, LayeredCredentials<FileCredentials>>;

/// Build the default resolver from a validated config.
pub fn default_resolver(config: &ExplorerConfig) -> Result<DefaultResolver, ConfigError> {
    let provider = GeminiClient::new(&config.provider)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let credentials = LayeredCredentials::new(
        EnvCredentials::new(&config.credential_env),
        FileCredentials::new(&config.credential_file),
    );
    Ok(FactResolver::new(provider, credentials)
        .with_archive(config.archive()?)
        .with_model(&config.provider.model)
        .with_offline_latency(config.offline_latency()))
}
