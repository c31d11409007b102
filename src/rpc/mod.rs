//! Transports for the remote tool server.
//!
//! The server exposes a small fixed set of named tools, each accepting and
//! returning an untyped key-value mapping. Two channels reach it: a
//! subprocess speaking newline-delimited JSON-RPC over stdin/stdout, and an
//! HTTP API with one endpoint per tool.

pub mod http;
pub mod messages;
pub mod stdio;

pub use http::{HttpTransport, HttpTransportConfig};
pub use messages::{ErrorCode, Methods, RpcError, ToolRequest, ToolResponse};
pub use stdio::{StdioTransport, StdioTransportConfig};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A channel to the remote tool server.
///
/// Implementations serialize a tool name and argument mapping, write them to
/// the channel, and parse a single response object back. A server-reported
/// error member is surfaced as a failure.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Invoke a named tool with an argument mapping, returning its result mapping.
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value>;

    /// Probe connectivity to the server.
    async fn probe(&self) -> Result<()>;

    /// List the tools the server exposes.
    async fn list_tools(&self) -> Result<Value>;
}
