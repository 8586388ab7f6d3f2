//! Configuration for Introspect
//!
//! Values come from `~/.introspect/config.toml` when it exists, otherwise the
//! built-in defaults. The API credential is never stored in the file; it is
//! read from `OPENAI_API_KEY`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the scoring core and its providers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model used for embeddings
    pub embedding_model: String,
    /// Length of embedding vectors (and of the zero-vector fallback)
    pub embedding_dimension: usize,
    /// Model used for reflections and cluster labels
    pub chat_model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Seed for k-means initialisation
    pub cluster_seed: u64,
    /// Default number of clusters
    pub cluster_count: usize,
    /// Session memory file
    pub store_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimension: 1536,
            chat_model: "gpt-4".to_string(),
            timeout_secs: 30,
            cluster_seed: 42,
            cluster_count: crate::memory::cluster::DEFAULT_CLUSTERS,
            store_path: crate::paths::memory_store(),
        }
    }
}

impl Config {
    /// Load configuration from `~/.introspect/config.toml`, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&crate::paths::config_path())
    }

    /// Load configuration from a specific file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
    }

    /// Provider credential from the environment
    ///
    /// Missing credentials are a startup error, not something to degrade around.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => anyhow::bail!(
                "{} not found in environment.\n\nExport your API key before running this command.",
                API_KEY_ENV
            ),
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
