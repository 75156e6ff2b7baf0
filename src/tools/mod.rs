//! Tool registry and dispatch.
//!
//! The catalog is closed: two Cypher execution tools and one schema
//! introspection tool. Dispatch routes a validated call to the matching
//! [`GraphClient`](crate::client::GraphClient) operation and returns the
//! result payload as JSON; the server layer turns it into content blocks.

pub mod cypher;
pub mod schema;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::client::GraphClient;
use crate::error::{McpError, Result};
use crate::store::GraphStore;

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "run_cypher_query")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create a new registry with all tools registered.
    pub fn new() -> Self {
        let mut tools = Vec::new();
        tools.extend(cypher::tools());
        tools.extend(schema::tools());
        Self { tools }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Dispatch a tool call to the appropriate handler.
    pub async fn dispatch<S: GraphStore>(
        &self,
        client: &GraphClient<S>,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        match name {
            "run_cypher_query" | "run_cypher_mutation" => {
                cypher::dispatch(client, name, args).await
            }
            "get_schema" => schema::dispatch(client, name, args).await,
            _ => Err(McpError::UnknownTool(name.to_string())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut required = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@type $req_type));)*
        $(props.insert($opt_name.to_string(), schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type object) => { serde_json::json!({"type": "object"}) };
}
