//! HTTP transport.
//!
//! Maps each tool name to a fixed endpoint path, POSTs the argument mapping
//! as a JSON body, and parses the JSON response body as the result mapping.
//! A GET /health probe checks connectivity under the client's ambient
//! timeout.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use crate::error::{Result, RoundtableError};
use crate::tools;

use super::ToolTransport;

/// Default server base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Tool name to endpoint path mapping.
const ENDPOINTS: [(&str, &str); 4] = [
    (tools::SELECT_PRACTITIONER_STYLE, "/api/select-style"),
    (tools::GENERATE_CODE_WITH_STYLE, "/api/generate-code"),
    (tools::COORDINATE_TEAM_WORKFLOW, "/api/coordinate-team"),
    (tools::ANALYZE_CODE_QUALITY, "/api/analyze-code"),
];

/// Resolve the endpoint path for a tool name.
fn endpoint_for(tool: &str) -> Option<&'static str> {
    ENDPOINTS
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, path)| *path)
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Server base URL, without trailing slash.
    pub base_url: String,
    /// Ambient client timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl HttpTransportConfig {
    /// Create config with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            ..Default::default()
        }
    }
}

/// Transport that reaches the tool server over HTTP.
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| RoundtableError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a transport for a base URL with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(HttpTransportConfig::with_base_url(base_url))
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// GET /health and return the server's status mapping.
    pub async fn health(&self) -> Result<Value> {
        let url = format!("{}/health", self.config.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RoundtableError::Server {
                code: response.status().as_u16() as i64,
                message: format!("Health check failed for {}", url),
            });
        }

        let body = response.json::<Value>().await?;
        info!("Connected to tool server at {}", self.config.base_url);
        Ok(body)
    }
}

#[async_trait]
impl ToolTransport for HttpTransport {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        let endpoint = endpoint_for(name).ok_or_else(|| RoundtableError::UnknownTool(name.to_string()))?;
        let url = format!("{}{}", self.config.base_url, endpoint);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(&arguments).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoundtableError::Server {
                code: status.as_u16() as i64,
                message: body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn probe(&self) -> Result<()> {
        self.health().await.map(|_| ())
    }

    async fn list_tools(&self) -> Result<Value> {
        let url = format!("{}/api/tools", self.config.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RoundtableError::Server {
                code: response.status().as_u16() as i64,
                message: format!("Tool listing failed for {}", url),
            });
        }

        let body = response.json::<Value>().await?;
        Ok(body.get("tools").cloned().unwrap_or(body))
    }
}
