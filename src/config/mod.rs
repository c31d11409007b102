//! Configuration for Roundtable.
//!
//! Search order:
//! 1. Explicit path if provided
//! 2. .roundtable.yml in current directory (project config)
//! 3. ~/.config/roundtable/roundtable.yml (user config)
//! 4. Default values

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How to reach the tool server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Spawn the server as a subprocess and speak JSON lines over its pipes.
    #[default]
    Stdio,
    /// POST tool calls to the server's HTTP API.
    Http,
}

/// Subprocess server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Command line used to launch the server.
    pub command: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: vec!["node".to_string(), "mcp-server-standalone.js".to_string()],
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Server base URL.
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Transport selection.
    pub transport: TransportKind,

    /// Subprocess server settings.
    pub server: ServerConfig,

    /// HTTP server settings.
    pub http: HttpConfig,

    /// Ambient per-request timeout in milliseconds.
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Enable debug output.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            request_timeout_ms: 30_000,
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".roundtable.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .roundtable.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .roundtable.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("roundtable").join("roundtable.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            eyre::bail!("request-timeout-ms must be > 0");
        }
        if self.transport == TransportKind::Stdio && self.server.command.is_empty() {
            eyre::bail!("server.command must not be empty for the stdio transport");
        }
        if self.transport == TransportKind::Http && self.http.base_url.is_empty() {
            eyre::bail!("http.base-url must not be empty for the http transport");
        }
        Ok(())
    }
}
