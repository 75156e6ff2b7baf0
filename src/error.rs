//! Error types for the MCP server.
//!
//! Every recoverable fault is a value of [`McpError`]; the dispatch
//! boundary turns these into error-flagged tool responses. Only failure
//! to establish the Neo4j connection at startup is fatal.

use serde::{Deserialize, Serialize};

/// MCP server errors.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum McpError {
    /// Error raised by the Neo4j driver while executing a query.
    #[error("{message}")]
    Store {
        /// Human-readable error message from the driver
        message: String,
    },

    /// Unknown tool requested.
    ///
    /// The display text is part of the protocol contract: callers match
    /// on `Unknown tool: <name>` with the name echoed verbatim.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArg(String),

    /// Invalid argument value.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// JSON-RPC protocol error.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error on the transport.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<neo4rs::Error> for McpError {
    fn from(err: neo4rs::Error) -> Self {
        McpError::Store {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Protocol(format!("JSON error: {}", err))
    }
}

/// JSON-RPC error codes.
pub mod rpc_codes {
    /// Parse error - Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params - Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;
