//! TOML configuration.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below, which reproduce the service's fixed deployment (local
//! store, public character API, port 8080, frontend on `localhost:3000`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::search::SearchMode;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Table holding the character documents.
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            collection: default_collection(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/characters.sqlite")
}
fn default_collection() -> String {
    "characters".to_string()
}
fn default_connect_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub url: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn default_upstream_url() -> String {
    "https://rickandmortyapi.com/api/character".to_string()
}
fn default_upstream_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchConfig {
    #[serde(default)]
    pub mode: SearchMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

/// True if `name` can be spliced into SQL as a bare table identifier.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Config {
    /// Check field-level constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.db.connect_timeout_secs == 0 {
            anyhow::bail!("db.connect_timeout_secs must be > 0");
        }
        if !is_plain_identifier(&self.db.collection) {
            anyhow::bail!(
                "db.collection must be a plain identifier (letters, digits, '_'), got '{}'",
                self.db.collection
            );
        }
        if self.upstream.url.trim().is_empty() {
            anyhow::bail!("upstream.url must not be empty");
        }
        if self.upstream.timeout_secs == 0 {
            anyhow::bail!("upstream.timeout_secs must be > 0");
        }
        if axum::http::HeaderValue::from_str(&self.server.allowed_origin).is_err() {
            anyhow::bail!(
                "server.allowed_origin is not a valid origin: '{}'",
                self.server.allowed_origin
            );
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
