//! Error types for Roundtable
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Roundtable
#[derive(Debug, Error)]
pub enum RoundtableError {
    /// Practitioner not found in the roster
    #[error("Practitioner not found: {0}")]
    PractitionerNotFound(String),

    /// Tool name not known to the transport
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Transport-level failure (spawn, connect, write, read, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error reported by the tool server itself
    #[error("Server error {code}: {message}")]
    Server { code: i64, message: String },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Roundtable operations
pub type Result<T> = std::result::Result<T, RoundtableError>;
