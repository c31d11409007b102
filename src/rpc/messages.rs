//! Wire message types for the tool server.
//!
//! The stdio channel carries JSON Lines (newline-delimited JSON). The
//! message schema uses JSON-RPC 2.0 field names (jsonrpc, id, method,
//! params, result, error), matching what the server speaks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RoundtableError};

/// Protocol tag carried on every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request sent to the tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Protocol version tag, always "2.0".
    pub jsonrpc: String,
    /// Unique request ID for correlating responses.
    pub id: u64,
    /// Method name (e.g. "tools/call").
    pub method: String,
    /// Method parameters as JSON value.
    #[serde(default)]
    pub params: Value,
}

impl ToolRequest {
    /// Create a new request with the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a request with no parameters.
    pub fn no_params(id: u64, method: impl Into<String>) -> Self {
        Self::new(id, method, Value::Object(Default::default()))
    }

    /// Create a tools/call request for a named tool.
    pub fn call_tool(id: u64, name: impl Into<String>, arguments: Value) -> Self {
        Self::new(
            id,
            Methods::TOOLS_CALL,
            serde_json::json!({
                "name": name.into(),
                "arguments": arguments,
            }),
        )
    }
}

/// Response received from the tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Protocol version tag.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request ID this response corresponds to.
    pub id: u64,
    /// Result value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl ToolResponse {
    /// Create a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: RpcError) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Check if this response indicates success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Extract the result, surfacing a server-reported error as a failure.
    pub fn into_result(self) -> Result<Value> {
        if let Some(err) = self.error {
            return Err(RoundtableError::Server {
                code: err.code,
                message: err.message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Error details in a server response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create a new error.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Invalid request error (-32600).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_REQUEST, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Method not found: {}", method.into()),
        )
    }

    /// Tool failure error (-32000), the code the server uses when a tool throws.
    pub fn tool_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TOOL_FAILURE, message)
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i64 = -32700;
    /// Invalid request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid parameters.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal server error.
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Tool call threw inside the server.
    pub const TOOL_FAILURE: i64 = -32000;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    pub const INITIALIZE: &'static str = "initialize";
    pub const TOOLS_LIST: &'static str = "tools/list";
    pub const TOOLS_CALL: &'static str = "tools/call";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_request_new() {
        let req = ToolRequest::new(1, "tools/list", serde_json::json!({}));
        assert_eq!(req.jsonrpc, "2.0");
        assert_eq!(req.id, 1);
        assert_eq!(req.method, "tools/list");
    }

    #[test]
    fn test_tool_request_no_params() {
        let req = ToolRequest::no_params(42, Methods::INITIALIZE);
        assert_eq!(req.id, 42);
        assert_eq!(req.method, "initialize");
        assert!(req.params.is_object());
    }

    #[test]
    fn test_tool_request_call_tool() {
        let req = ToolRequest::call_tool(
            7,
            "analyze_code_quality",
            serde_json::json!({"code": "fn main() {}"}),
        );
        assert_eq!(req.method, "tools/call");
        assert_eq!(req.params["name"], "analyze_code_quality");
        assert_eq!(req.params["arguments"]["code"], "fn main() {}");
    }

    #[test]
    fn test_tool_request_serialize() {
        let req = ToolRequest::call_tool(1, "select_practitioner_style", serde_json::json!({}));
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"method\":\"tools/call\""));
    }

    #[test]
    fn test_tool_response_success() {
        let resp = ToolResponse::success(1, serde_json::json!({"overallScore": 80}));
        assert!(resp.is_success());
        assert_eq!(resp.into_result().unwrap()["overallScore"], 80);
    }

    #[test]
    fn test_tool_response_error_surfaces_as_failure() {
        let resp = ToolResponse::error(1, RpcError::tool_failure("Unknown tool: frobnicate"));
        assert!(!resp.is_success());
        let err = resp.into_result().unwrap_err();
        match err {
            crate::error::RoundtableError::Server { code, message } => {
                assert_eq!(code, -32000);
                assert!(message.contains("frobnicate"));
            }
            other => panic!("Expected server error, got {other:?}"),
        }
    }

    #[test]
    fn test_tool_response_parsing_without_jsonrpc_tag() {
        // Some server variants omit the version tag on responses.
        let json = r#"{"id":3,"result":{"tools":[]}}"#;
        let resp: ToolResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, 3);
        assert!(resp.is_success());
    }

    #[test]
    fn test_tool_response_null_result() {
        let json = r#"{"jsonrpc":"2.0","id":1}"#;
        let resp: ToolResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_rpc_error_constructors() {
        assert_eq!(RpcError::parse_error("x").code, ErrorCode::PARSE_ERROR);
        assert_eq!(RpcError::invalid_request("x").code, ErrorCode::INVALID_REQUEST);
        assert_eq!(RpcError::method_not_found("x").code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(RpcError::tool_failure("x").code, ErrorCode::TOOL_FAILURE);
    }

    #[test]
    fn test_rpc_error_method_not_found_message() {
        let err = RpcError::method_not_found("resources/list");
        assert!(err.message.contains("resources/list"));
    }

    #[test]
    fn test_request_roundtrip() {
        let req = ToolRequest::call_tool(123, "coordinate_team_workflow", serde_json::json!({"priority": "high"}));
        let json = serde_json::to_string(&req).unwrap();
        let parsed: ToolRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 123);
        assert_eq!(parsed.params["arguments"]["priority"], "high");
    }

    #[test]
    fn test_response_roundtrip() {
        let resp = ToolResponse::error(9, RpcError::new(-32603, "boom"));
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: ToolResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 9);
        assert_eq!(parsed.error.unwrap().code, -32603);
    }
}
