//! Subprocess transport.
//!
//! Spawns the tool server as a child process and speaks newline-delimited
//! JSON-RPC over its stdin/stdout: one request line out, one response line
//! back. Calls serialize on the pipe; request IDs increment per connection.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::error::{Result, RoundtableError};

use super::ToolTransport;
use super::messages::{Methods, ToolRequest, ToolResponse};

/// Configuration for the subprocess transport.
#[derive(Debug, Clone)]
pub struct StdioTransportConfig {
    /// Command line used to launch the server (program + args).
    pub command: Vec<String>,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for StdioTransportConfig {
    fn default() -> Self {
        Self {
            command: vec!["node".to_string(), "mcp-server-standalone.js".to_string()],
            request_timeout_ms: 30_000,
        }
    }
}

impl StdioTransportConfig {
    /// Create config with a custom server command line.
    pub fn with_command(command: Vec<String>) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }
}

/// The spawned server's pipe ends.
struct ServerIo {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Transport that runs the tool server as a subprocess.
pub struct StdioTransport {
    config: StdioTransportConfig,
    io: Mutex<Option<ServerIo>>,
    next_id: AtomicU64,
}

impl StdioTransport {
    /// Create a new transport with config. The server is spawned lazily on
    /// the first request.
    pub fn new(config: StdioTransportConfig) -> Self {
        Self {
            config,
            io: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a transport with a custom server command line.
    pub fn with_command(command: Vec<String>) -> Self {
        Self::new(StdioTransportConfig::with_command(command))
    }

    /// Spawn the server subprocess if it is not already running.
    pub async fn start(&self) -> Result<()> {
        let mut io = self.io.lock().await;
        if io.is_some() {
            return Ok(());
        }

        let program = self
            .config
            .command
            .first()
            .ok_or_else(|| RoundtableError::Config("server command is empty".to_string()))?;

        let mut child = Command::new(program)
            .args(&self.config.command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| RoundtableError::Transport(format!("Failed to spawn {}: {}", program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RoundtableError::Transport("Child stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RoundtableError::Transport("Child stdout not captured".to_string()))?;

        info!("Spawned tool server: {}", self.config.command.join(" "));
        *io = Some(ServerIo {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        });

        Ok(())
    }

    /// Terminate the server subprocess.
    pub async fn shutdown(&self) -> Result<()> {
        let mut io = self.io.lock().await;
        if let Some(mut server) = io.take() {
            server
                .child
                .kill()
                .await
                .map_err(|e| RoundtableError::Transport(format!("Failed to kill server: {}", e)))?;
            info!("Tool server terminated");
        }
        Ok(())
    }

    /// Send the initialize handshake and return the server's info mapping.
    pub async fn initialize(&self) -> Result<Value> {
        self.request(Methods::INITIALIZE, serde_json::json!({})).await
    }

    /// Send one request line and read one response line.
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.start().await?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = ToolRequest::new(id, method, params);
        let line = serde_json::to_string(&request)?;
        debug!("stdio request {}: {}", id, method);

        let mut io = self.io.lock().await;
        let server = io
            .as_mut()
            .ok_or_else(|| RoundtableError::Transport("Server not running".to_string()))?;

        server
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| RoundtableError::Transport(format!("Failed to write request: {}", e)))?;
        server
            .stdin
            .write_all(b"\n")
            .await
            .map_err(|e| RoundtableError::Transport(format!("Failed to write newline: {}", e)))?;
        server
            .stdin
            .flush()
            .await
            .map_err(|e| RoundtableError::Transport(format!("Failed to flush: {}", e)))?;

        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        let mut response_line = String::new();
        let read = tokio::time::timeout(timeout, server.stdout.read_line(&mut response_line))
            .await
            .map_err(|_| RoundtableError::Transport("Request timeout".to_string()))?
            .map_err(|e| RoundtableError::Transport(format!("Failed to read response: {}", e)))?;

        if read == 0 {
            return Err(RoundtableError::Transport("Server closed the pipe".to_string()));
        }

        let response: ToolResponse = serde_json::from_str(response_line.trim())
            .map_err(|e| RoundtableError::Transport(format!("Invalid response: {}", e)))?;

        if response.id != id {
            return Err(RoundtableError::Transport(format!(
                "Response id mismatch: expected {}, got {}",
                id, response.id
            )));
        }

        response.into_result()
    }
}

/// Unwrap the MCP content envelope around a tools/call result.
///
/// The server serializes the tool's mapping into `content[0].text`; the HTTP
/// API returns the bare mapping, so both transports normalize to that shape.
fn unwrap_content(result: Value) -> Value {
    if let Some(text) = result
        .get("content")
        .and_then(|c| c.get(0))
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
    {
        if let Ok(inner) = serde_json::from_str::<Value>(text) {
            return inner;
        }
    }
    result
}

#[async_trait]
impl ToolTransport for StdioTransport {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        let params = serde_json::json!({
            "name": name,
            "arguments": arguments,
        });
        let result = self.request(Methods::TOOLS_CALL, params).await?;
        Ok(unwrap_content(result))
    }

    async fn probe(&self) -> Result<()> {
        self.initialize().await.map(|_| ())
    }

    async fn list_tools(&self) -> Result<Value> {
        let result = self.request(Methods::TOOLS_LIST, serde_json::json!({})).await?;
        Ok(result.get("tools").cloned().unwrap_or(result))
    }
}
