//! Schema introspection tool.
//!
//! Tools: get_schema

use serde_json::{Map, Value as JsonValue};

use crate::client::GraphClient;
use crate::error::{McpError, Result};
use crate::schema;
use crate::store::GraphStore;
use crate::tools::ToolDef;

/// Get the schema tool definition.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        "get_schema",
        "Get the current Neo4j schema including labels, relationship types, \
         and properties.",
        schema!(object {}),
    )]
}

/// Dispatch a schema tool call.
pub async fn dispatch<S: GraphStore>(
    client: &GraphClient<S>,
    name: &str,
    _args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "get_schema" => client.get_schema().await,
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
