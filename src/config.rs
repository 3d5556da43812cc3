use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::warn;

use crate::errors::RagError;

/// Model provider API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Qdrant endpoint
pub const QDRANT_URL: &str = "QDRANT_URL";
/// Qdrant API key
pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";

/// Variables that must be present before any client is built
pub const REQUIRED_ENV_VARS: [&str; 3] = [OPENAI_API_KEY, QDRANT_URL, QDRANT_API_KEY];

/// Tunable service settings. Every field has a default, so an empty or
/// partial TOML file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub collection: String,
    pub embedding_model: String,
    pub embedding_dimensions: u32,
    pub chat_model: String,
    pub temperature: f32,
    pub top_k: u64,
    pub score_threshold: f32,
    pub openai_base_url: String,
    /// Per-request timeout handed to the HTTP client
    pub request_timeout_secs: u64,
    /// Answer with the refusal phrase instead of calling the model when
    /// nothing passes the score threshold
    pub refuse_on_empty_context: bool,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            collection: "contrato_arriendo_pablo".to_string(),
            embedding_model: "text-embedding-3-large".to_string(),
            embedding_dimensions: 512,
            chat_model: "gpt-4o".to_string(),
            temperature: 0.1,
            top_k: 3,
            score_threshold: 0.1,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: 60,
            refuse_on_empty_context: false,
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Settings {
    /// Load settings from an explicit path, or from the default location
    /// when it exists. Missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Settings::default())
                }
            }
        }
    }

    /// Parse a settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Default settings file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".rag-chain").join("config.toml"))
    }

    /// Reject values the collaborators cannot accept
    pub fn validate(&self) -> std::result::Result<(), RagError> {
        if self.collection.trim().is_empty() {
            return Err(RagError::ConfigError("collection must not be empty".to_string()));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be at least 1".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RagError::ConfigError(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.embedding_dimensions == 0 {
            return Err(RagError::ConfigError(
                "embedding_dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where secrets and endpoints are read from.
///
/// Lookups happen on every construction attempt, so a source may change
/// between attempts.
pub trait SecretSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Hook run before each construction attempt
    fn refresh(&self) {}
}

/// Live process environment, re-reading `.env` on refresh
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn refresh(&self) {
        // Variables already set in the process are not overwritten
        if let Some(problem) = dotenv_problem(&dotenvy::dotenv()) {
            warn!(error = %problem, "Could not load .env");
        }
    }
}

/// A missing `.env` is normal; anything else is worth reporting
fn dotenv_problem(result: &std::result::Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => Some(e.to_string()),
    }
}

/// In-memory source, mutable at runtime
#[derive(Debug, Default)]
pub struct StaticSecrets {
    values: RwLock<HashMap<String, String>>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}

/// Validated credentials for the external collaborators
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub qdrant_url: String,
    pub qdrant_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_api_key", &"<redacted>")
            .finish()
    }
}

/// Check every required variable and report all the missing ones at once.
pub fn validate_environment(source: &dyn SecretSource) -> std::result::Result<Credentials, RagError> {
    let lookup = |key: &str| source.get(key).filter(|v| !v.trim().is_empty());

    let missing: Vec<String> = REQUIRED_ENV_VARS
        .iter()
        .filter(|key| lookup(key).is_none())
        .map(|key| key.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(RagError::MissingEnvironment { missing });
    }

    Ok(Credentials {
        openai_api_key: lookup(OPENAI_API_KEY).unwrap_or_default(),
        qdrant_url: lookup(QDRANT_URL).unwrap_or_default(),
        qdrant_api_key: lookup(QDRANT_API_KEY).unwrap_or_default(),
    })
}
