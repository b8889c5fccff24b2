//! Configuration loading and management.
//!
//! Loads pantrybot configuration from `./config.toml` (or
//! `$PANTRYBOT_CONFIG_PATH`). Environment variables override file values;
//! file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Where a loaded configuration came from.
///
/// Returned alongside the config so the caller can log it once a tracing
/// subscriber exists; this module emits no log lines of its own during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the TOML file at the given path.
    File(PathBuf),
    /// No config file found; built-in defaults.
    Defaults,
}

/// Top-level pantrybot configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// LLM extraction settings (`[llm]`).
    pub llm: LlmConfig,
    /// WhatsApp bridge settings (`[whatsapp]`).
    pub whatsapp: WhatsAppConfig,
    /// Filesystem paths (`[paths]`).
    pub paths: PathsConfig,
}

impl BotConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Config file path: `$PANTRYBOT_CONFIG_PATH` or `./config.toml`.
    /// If the file does not exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<(Self, ConfigSource)> {
        let path = Self::config_path(|key| std::env::var(key).ok());
        let (mut config, source) = Self::load_from_path(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, source))
    }

    /// Load from a specific TOML file path, no env overrides.
    ///
    /// A missing file is not an error; defaults are returned with
    /// [`ConfigSource::Defaults`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<(Self, ConfigSource)> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config: BotConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok((config, ConfigSource::File(path.to_path_buf())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok((BotConfig::default(), ConfigSource::Defaults))
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config file {}: {e}",
                path.display()
            )),
        }
    }

    /// Resolve config file path using the given env resolver.
    fn config_path(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("PANTRYBOT_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("config.toml")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(key) = env("GROQ_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(v) = env("PANTRYBOT_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = env("PANTRYBOT_BRIDGE_PORT") {
            match v.parse() {
                Ok(port) => self.whatsapp.bridge_port = port,
                Err(_) => tracing::warn!(
                    var = "PANTRYBOT_BRIDGE_PORT",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("DB_PATH") {
            self.paths.session_db = v;
        }
        if let Some(v) = env("PANTRYBOT_LOGS_DIR") {
            self.paths.logs_dir = v;
        }
    }

    /// Parse a TOML string into config (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error when the TOML does not match the config schema.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

/// LLM extraction settings (`[llm]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Groq API key. Usually supplied via `GROQ_API_KEY`, never committed
    /// to the config file.
    pub api_key: Option<String>,
    /// Model identifier for extraction requests.
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: crate::groq::completions::DEFAULT_MODEL.to_owned(),
        }
    }
}

/// WhatsApp bridge settings (`[whatsapp]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Port the bridge sidecar listens on.
    pub bridge_port: u16,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            bridge_port: crate::whatsapp::client::DEFAULT_BRIDGE_PORT,
        }
    }
}

/// Filesystem paths (`[paths]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// WhatsApp session store, owned and read by the bridge sidecar.
    pub session_db: String,
    /// Directory for rotated JSON log files.
    pub logs_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            session_db: "pantrybot.db".to_owned(),
            logs_dir: "logs".to_owned(),
        }
    }
}
