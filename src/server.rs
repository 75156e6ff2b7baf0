//! MCP server implementation.
//!
//! Handles JSON-RPC 2.0 over stdio according to the MCP protocol
//! specification. Requests are processed strictly in arrival order: one
//! line in, one response out, flushed before the next read. The protocol
//! has no request correlation beyond ordering, so this is load-bearing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::client::GraphClient;
use crate::error::{rpc_codes, Result};
use crate::store::GraphStore;
use crate::tools::ToolRegistry;

/// MCP protocol version we support.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server information.
const SERVER_NAME: &str = "neo4j-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version marker, must be "2.0".
    pub jsonrpc: String,
    /// Request id; absent for notifications.
    pub id: Option<JsonValue>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<JsonValue>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// Protocol version marker, always "2.0".
    pub jsonrpc: String,
    /// Echo of the request id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    /// Success payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    /// Protocol-level error payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Error code (see [`rpc_codes`]).
    pub code: i32,
    /// Error message.
    pub message: String,
    /// Optional structured error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create a protocol-level error response.
    pub fn error(id: Option<JsonValue>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
        }
    }

    /// Create a tool response carrying one text content block.
    ///
    /// Tool faults are not protocol errors: they ride inside a normal
    /// result with `isError` set, and the loop keeps serving.
    pub fn tool_text(id: Option<JsonValue>, text: String, is_error: bool) -> Self {
        Self::success(
            id,
            serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": text
                }],
                "isError": is_error
            }),
        )
    }
}

/// MCP server.
pub struct McpServer<S> {
    client: GraphClient<S>,
    registry: ToolRegistry,
}

impl<S: GraphStore> McpServer<S> {
    /// Create a new MCP server over the given graph client.
    pub fn new(client: GraphClient<S>) -> Self {
        Self {
            client,
            registry: ToolRegistry::new(),
        }
    }

    /// Get the graph client, e.g. for shutdown cleanup.
    pub fn client(&self) -> &GraphClient<S> {
        &self.client
    }

    /// Run the server, reading from stdin and writing to stdout.
    ///
    /// Returns when the client disconnects (EOF). No second request is
    /// read before the previous response has been written and flushed.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                // EOF - client disconnected
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Parse the request
            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => JsonRpcResponse::error(
                    None,
                    rpc_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ),
            };

            // Send response
            let response_json = serde_json::to_string(&response)?;
            stdout.write_all(response_json.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        // Validate JSON-RPC version
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                rpc_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version".to_string(),
            );
        }

        tracing::debug!(method = %request.method, "handling request");

        // Route to appropriate handler
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                // Client acknowledgment - no response needed for notifications
                // but we'll still respond with null to be safe
                JsonRpcResponse::success(request.id, JsonValue::Null)
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
            _ => JsonRpcResponse::error(
                request.id,
                rpc_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
            ),
        }
    }

    /// Handle the initialize request.
    ///
    /// The server is stateless across the handshake: tool calls are
    /// served whether or not the client initialized first.
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    /// Handle the tools/list request.
    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools: Vec<JsonValue> = self
            .registry
            .tools()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
    }

    /// Handle the tools/call request.
    async fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        // Extract name and arguments from params
        let params = match &request.params {
            Some(JsonValue::Object(obj)) => obj,
            _ => {
                return JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INVALID_PARAMS,
                    "Missing params object".to_string(),
                )
            }
        };

        let name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n.to_string(),
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INVALID_PARAMS,
                    "Missing 'name' in params".to_string(),
                )
            }
        };

        let arguments = match params.get("arguments") {
            Some(JsonValue::Object(obj)) => obj.clone(),
            Some(JsonValue::Null) | None => Map::new(),
            _ => {
                return JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INVALID_PARAMS,
                    "'arguments' must be an object".to_string(),
                )
            }
        };

        // Dispatch the tool call. Every fault - unknown tool, missing
        // argument, store failure - becomes an error-flagged tool
        // response here; nothing propagates to the transport.
        match self.registry.dispatch(&self.client, &name, arguments).await {
            Ok(result) => match serde_json::to_string_pretty(&result) {
                Ok(text) => JsonRpcResponse::tool_text(request.id, text, false),
                Err(e) => JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INTERNAL_ERROR,
                    format!("Failed to serialize tool result: {}", e),
                ),
            },
            Err(err) => {
                tracing::debug!(tool = %name, error = %err, "tool call failed");
                JsonRpcResponse::tool_text(request.id, err.to_string(), true)
            }
        }
    }
}
