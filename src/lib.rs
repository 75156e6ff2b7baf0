//! # neo4j-mcp
//!
//! MCP (Model Context Protocol) server for Neo4j graph databases.
//!
//! This crate provides an MCP server that exposes Cypher execution and
//! schema introspection as tools for AI agents. It implements the MCP
//! protocol over stdin/stdout using JSON-RPC 2.0.
//!
//! ## Tools
//!
//! - **run_cypher_query**: execute a read-intent Cypher query
//! - **run_cypher_mutation**: execute a write-intent Cypher statement
//! - **get_schema**: enumerate node labels and relationship types
//!
//! Query results are serialized into a plain tagged wire form: nodes,
//! relationships and paths become `{"_type": ...}` objects with entity
//! references flattened to identity strings, so the output is always
//! tree-shaped and safe to transmit.
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI
//! tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "neo4j": {
//!       "command": "/path/to/neo4j-mcp",
//!       "env": {
//!         "NEO4J_URI": "bolt://localhost:7687",
//!         "NEO4J_USERNAME": "neo4j",
//!         "NEO4J_PASSWORD": "password"
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! For testing or embedding, the server is generic over the
//! [`GraphStore`] trait, so any store double can stand in for Neo4j:
//!
//! ```no_run
//! use neo4j_mcp::{GraphClient, McpServer, Neo4jConfig, Neo4jStore};
//!
//! # async fn run() -> neo4j_mcp::Result<()> {
//! let config = Neo4jConfig {
//!     uri: "bolt://localhost:7687".to_string(),
//!     username: "neo4j".to_string(),
//!     password: "password".to_string(),
//!     database: "neo4j".to_string(),
//! };
//! let store = Neo4jStore::connect(&config).await?;
//! let client = GraphClient::new(store);
//! client.verify_connectivity().await?;
//! let mut server = McpServer::new(client);
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod convert;
mod error;
mod server;
mod store;
mod tools;

pub use client::GraphClient;
pub use convert::{bolt_to_json, json_to_bolt};
pub use error::{McpError, Result};
pub use server::{JsonRpcRequest, JsonRpcResponse, McpServer};
pub use store::{GraphStore, Neo4jConfig, Neo4jStore, Record};
pub use tools::{ToolDef, ToolRegistry};
