//! Cypher execution tools.
//!
//! Tools: run_cypher_query, run_cypher_mutation

use serde_json::{Map, Value as JsonValue};

use crate::client::GraphClient;
use crate::convert::{get_optional_object, get_string_arg};
use crate::error::{McpError, Result};
use crate::schema;
use crate::store::GraphStore;
use crate::tools::ToolDef;

/// Get the Cypher tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "run_cypher_query",
            "Execute a Cypher query against Neo4j (READ-ONLY). Use this to query \
             the graph and retrieve information.",
            schema!(object {
                required: { "query": string },
                optional: { "params": object }
            }),
        ),
        ToolDef::new(
            "run_cypher_mutation",
            "Execute a Cypher mutation against Neo4j (CREATE, UPDATE, DELETE). \
             Use this to modify the graph.",
            schema!(object {
                required: { "query": string },
                optional: { "params": object }
            }),
        ),
    ]
}

/// Dispatch a Cypher tool call.
pub async fn dispatch<S: GraphStore>(
    client: &GraphClient<S>,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let query = get_string_arg(&args, "query")?;
    let params = get_optional_object(&args, "params")?;

    let rows = match name {
        "run_cypher_query" => client.run_query(&query, &params).await?,
        "run_cypher_mutation" => client.run_mutation(&query, &params).await?,
        _ => return Err(McpError::UnknownTool(name.to_string())),
    };

    Ok(JsonValue::Array(rows.into_iter().map(JsonValue::Object).collect()))
}
