//! Integration tests for the MCP server.
//!
//! All tests run against an in-memory store double, so no Neo4j instance
//! is required. The double tracks session lifecycles and can inject
//! faults mid-query.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::{json, Map, Value as JsonValue};

use neo4j_mcp::{GraphClient, GraphStore, McpError, McpServer, Record, Result, ToolRegistry};

/// Canned behavior for one query text.
#[derive(Clone)]
enum Stub {
    Rows(Vec<Record>),
    Fail(String),
}

/// In-memory stand-in for the Neo4j store.
///
/// Models the session discipline of the real adapter: every `run` opens
/// exactly one session and closes it before returning, whether the query
/// succeeds or faults.
#[derive(Default)]
struct FakeStore {
    stubs: Mutex<HashMap<String, Stub>>,
    calls: Mutex<Vec<(String, Map<String, JsonValue>)>>,
    sessions_opened: AtomicUsize,
    sessions_closed: AtomicUsize,
}

impl FakeStore {
    fn new() -> Self {
        Self::default()
    }

    fn stub_rows(&self, query: &str, rows: Vec<JsonValue>) {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                JsonValue::Object(map) => map,
                other => panic!("stub rows must be objects, got {}", other),
            })
            .collect();
        self.stubs
            .lock()
            .unwrap()
            .insert(query.to_string(), Stub::Rows(rows));
    }

    fn stub_failure(&self, query: &str, message: &str) {
        self.stubs
            .lock()
            .unwrap()
            .insert(query.to_string(), Stub::Fail(message.to_string()));
    }

    fn calls(&self) -> Vec<(String, Map<String, JsonValue>)> {
        self.calls.lock().unwrap().clone()
    }

    fn opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.sessions_closed.load(Ordering::SeqCst)
    }
}

impl GraphStore for FakeStore {
    async fn run(&self, text: &str, params: &Map<String, JsonValue>) -> Result<Vec<Record>> {
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), params.clone()));

        let stub = self.stubs.lock().unwrap().get(text).cloned();
        let result = match stub {
            Some(Stub::Rows(rows)) => Ok(rows),
            Some(Stub::Fail(message)) => Err(McpError::Store { message }),
            None => Ok(Vec::new()),
        };

        // The session is released on the fault path too.
        self.sessions_closed.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// The client takes ownership of its store, so tests keep a second
/// handle through an `Arc` for stubbing and inspection.
fn client_with_store() -> (GraphClient<std::sync::Arc<FakeStore>>, std::sync::Arc<FakeStore>) {
    let store = std::sync::Arc::new(FakeStore::new());
    (GraphClient::new(store.clone()), store)
}

// =============================================================================
// Tool Registry
// =============================================================================

#[test]
fn test_tool_catalog_is_closed() {
    let registry = ToolRegistry::new();
    let names: Vec<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["run_cypher_query", "run_cypher_mutation", "get_schema"]
    );
}

#[test]
fn test_all_tools_have_required_fields() {
    let registry = ToolRegistry::new();
    for tool in registry.tools() {
        assert!(!tool.name.is_empty(), "Tool name should not be empty");
        assert!(
            !tool.description.is_empty(),
            "Tool description should not be empty"
        );
        assert!(
            tool.input_schema.is_object(),
            "Tool input_schema should be an object"
        );
    }
}

#[test]
fn test_query_tools_require_query_argument() {
    let registry = ToolRegistry::new();
    for tool in registry.tools() {
        if tool.name.starts_with("run_cypher") {
            let required = tool.input_schema["required"].as_array().unwrap();
            assert_eq!(required, &vec![json!("query")]);
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn test_run_query_returns_serialized_rows() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    store.stub_rows(
        "MATCH (n:Person) RETURN n",
        vec![json!({
            "n": {
                "_type": "Node",
                "id": "1",
                "labels": ["Person"],
                "properties": {"name": "Ada"}
            }
        })],
    );

    let result = registry
        .dispatch(
            &client,
            "run_cypher_query",
            args(json!({"query": "MATCH (n:Person) RETURN n"})),
        )
        .await
        .expect("query should succeed");

    let rows = result.as_array().expect("Expected array of rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["n"]["_type"], json!("Node"));
    assert_eq!(rows[0]["n"]["properties"]["name"], json!("Ada"));
}

#[tokio::test]
async fn test_mutation_has_identical_behavior() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    store.stub_rows(
        "CREATE (n:Person {name: $name}) RETURN n.name AS name",
        vec![json!({"name": "Ada"})],
    );

    let result = registry
        .dispatch(
            &client,
            "run_cypher_mutation",
            args(json!({
                "query": "CREATE (n:Person {name: $name}) RETURN n.name AS name",
                "params": {"name": "Ada"}
            })),
        )
        .await
        .expect("mutation should succeed");

    assert_eq!(result, json!([{"name": "Ada"}]));
}

#[tokio::test]
async fn test_params_are_passed_through() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    registry
        .dispatch(
            &client,
            "run_cypher_query",
            args(json!({
                "query": "MATCH (n {name: $name}) RETURN n",
                "params": {"name": "Ada", "limit": 5}
            })),
        )
        .await
        .expect("query should succeed");

    let calls = store.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.get("name"), Some(&json!("Ada")));
    assert_eq!(calls[0].1.get("limit"), Some(&json!(5)));
}

#[tokio::test]
async fn test_params_default_to_empty() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    registry
        .dispatch(
            &client,
            "run_cypher_query",
            args(json!({"query": "RETURN 1"})),
        )
        .await
        .expect("query should succeed");

    assert!(store.calls()[0].1.is_empty());
}

#[tokio::test]
async fn test_unknown_tool_message_echoes_name() {
    let (client, _store) = client_with_store();
    let registry = ToolRegistry::new();

    let err = registry
        .dispatch(&client, "run_gremlin_query", args(json!({})))
        .await
        .expect_err("unknown tool must fail");

    assert_eq!(err.to_string(), "Unknown tool: run_gremlin_query");
}

#[tokio::test]
async fn test_missing_required_argument() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    let err = registry
        .dispatch(&client, "run_cypher_query", args(json!({})))
        .await
        .expect_err("missing query must fail");

    assert!(err.to_string().contains("query"));
    // A caller error never reaches the store.
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_store_fault_surfaces_as_error_value() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    store.stub_failure("MATCH (n RETURN n", "Invalid input 'RETURN'");

    let err = registry
        .dispatch(
            &client,
            "run_cypher_query",
            args(json!({"query": "MATCH (n RETURN n"})),
        )
        .await
        .expect_err("malformed query must fail");

    assert!(err.to_string().contains("Invalid input"));
}

// =============================================================================
// Session discipline
// =============================================================================

#[tokio::test]
async fn test_one_session_per_operation() {
    let (client, store) = client_with_store();

    client
        .run_query("RETURN 1", &Map::new())
        .await
        .expect("query should succeed");

    assert_eq!(store.opened(), 1);
    assert_eq!(store.closed(), 1);
}

#[tokio::test]
async fn test_session_closed_on_fault() {
    let (client, store) = client_with_store();

    store.stub_failure("RETURN boom", "constraint violation");
    let _ = client.run_query("RETURN boom", &Map::new()).await;

    assert_eq!(store.opened(), 1);
    assert_eq!(store.closed(), 1);
}

#[tokio::test]
async fn test_sequential_calls_dispatch_in_order() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    for query in ["RETURN 1", "RETURN 2", "RETURN 3"] {
        registry
            .dispatch(&client, "run_cypher_query", args(json!({"query": query})))
            .await
            .expect("query should succeed");
    }

    let texts: Vec<String> = store.calls().into_iter().map(|(q, _)| q).collect();
    assert_eq!(texts, vec!["RETURN 1", "RETURN 2", "RETURN 3"]);
}

// =============================================================================
// Schema introspection
// =============================================================================

fn stub_schema(store: &FakeStore) {
    store.stub_rows(
        "CALL db.labels()",
        vec![json!({"label": "Person"}), json!({"label": "Place"})],
    );
    store.stub_rows(
        "CALL db.relationshipTypes()",
        vec![json!({"relationshipType": "KNOWS"})],
    );
}

#[tokio::test]
async fn test_get_schema_extracts_columns() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();
    stub_schema(&store);

    let result = registry
        .dispatch(&client, "get_schema", args(json!({})))
        .await
        .expect("get_schema should succeed");

    assert_eq!(result["labels"], json!(["Person", "Place"]));
    assert_eq!(result["relationshipTypes"], json!(["KNOWS"]));
}

#[tokio::test]
async fn test_get_schema_tolerates_unnamed_column() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();

    // A store that returns one anonymous column per row instead of the
    // documented column name.
    store.stub_rows("CALL db.labels()", vec![json!({"name": "Person"})]);
    store.stub_rows(
        "CALL db.relationshipTypes()",
        vec![json!({"name": "KNOWS"})],
    );

    let result = registry
        .dispatch(&client, "get_schema", args(json!({})))
        .await
        .expect("get_schema should succeed");

    assert_eq!(result["labels"], json!(["Person"]));
    assert_eq!(result["relationshipTypes"], json!(["KNOWS"]));
}

#[tokio::test]
async fn test_get_schema_is_idempotent() {
    let (client, store) = client_with_store();
    let registry = ToolRegistry::new();
    stub_schema(&store);

    let first = registry
        .dispatch(&client, "get_schema", args(json!({})))
        .await
        .unwrap();
    let second = registry
        .dispatch(&client, "get_schema", args(json!({})))
        .await
        .unwrap();

    // Set equality; the store does not guarantee enumeration order.
    let as_set = |v: &JsonValue, key: &str| -> std::collections::BTreeSet<String> {
        v[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(as_set(&first, "labels"), as_set(&second, "labels"));
    assert_eq!(
        as_set(&first, "relationshipTypes"),
        as_set(&second, "relationshipTypes")
    );
}

// =============================================================================
// Connectivity check
// =============================================================================

#[tokio::test]
async fn test_verify_connectivity_requires_rows() {
    let (client, store) = client_with_store();

    // Empty result: the check must fail.
    assert!(client.verify_connectivity().await.is_err());

    store.stub_rows(
        "RETURN 'Neo4j connected' AS status",
        vec![json!({"status": "Neo4j connected"})],
    );
    assert!(client.verify_connectivity().await.is_ok());
}

// =============================================================================
// Server envelopes
// =============================================================================

fn request(body: JsonValue) -> neo4j_mcp::JsonRpcRequest {
    serde_json::from_value(body).expect("valid request")
}

#[tokio::test]
async fn test_tools_call_success_envelope() {
    let (client, store) = client_with_store();
    store.stub_rows("RETURN 1 AS one", vec![json!({"one": 1})]);
    let mut server = McpServer::new(client);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {
                "name": "run_cypher_query",
                "arguments": {"query": "RETURN 1 AS one"}
            }
        })))
        .await;

    let result = response.result.expect("success result");
    assert_eq!(result["isError"], json!(false));
    let content = result["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], json!("text"));

    // The text payload decodes back into the result shape.
    let decoded: JsonValue =
        serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, json!([{"one": 1}]));
}

#[tokio::test]
async fn test_tools_call_unknown_tool_envelope() {
    let (client, _store) = client_with_store();
    let mut server = McpServer::new(client);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "bogus", "arguments": {}}
        })))
        .await;

    // Tool faults are error-flagged responses, not protocol errors.
    assert!(response.error.is_none());
    let result = response.result.expect("fault still yields a result");
    assert_eq!(result["isError"], json!(true));
    assert_eq!(result["content"][0]["text"], json!("Unknown tool: bogus"));
}

#[tokio::test]
async fn test_tools_call_store_fault_envelope() {
    let (client, store) = client_with_store();
    store.stub_failure("RETURN boom", "connection reset");
    let mut server = McpServer::new(client);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "run_cypher_query",
                "arguments": {"query": "RETURN boom"}
            }
        })))
        .await;

    let result = response.result.expect("fault still yields a result");
    assert_eq!(result["isError"], json!(true));
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("connection reset"));
}

#[tokio::test]
async fn test_tools_list_response() {
    let (client, _store) = client_with_store();
    let mut server = McpServer::new(client);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/list"
        })))
        .await;

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 3);
    assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
}

#[tokio::test]
async fn test_initialize_reports_tool_capability() {
    let (client, _store) = client_with_store();
    let mut server = McpServer::new(client);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "initialize",
            "params": {}
        })))
        .await;

    let result = response.result.unwrap();
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(result["serverInfo"]["name"], json!("neo4j-mcp"));
}

#[tokio::test]
async fn test_unknown_method_is_protocol_error() {
    let (client, _store) = client_with_store();
    let mut server = McpServer::new(client);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "resources/list"
        })))
        .await;

    let error = response.error.expect("unknown method is a protocol error");
    assert_eq!(error.code, -32601);
}

/// Coerce a JSON object literal into an arguments map.
fn args(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    }
}
