//! Neo4j-backed [`GraphStore`] implementation.
//!
//! Wraps a `neo4rs::Graph`, which owns a long-lived connection pool.
//! Every query borrows one pooled session, runs in auto-commit mode and
//! returns the session when the row stream is drained or dropped, so the
//! release also happens when execution fails mid-stream.

use neo4rs::{query, BoltType, ConfigBuilder, Graph};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

use crate::convert::{bolt_to_json, json_to_bolt};
use crate::error::Result;
use crate::store::{GraphStore, Record};

/// Connection settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    /// Bolt URI, e.g. `bolt://localhost:7687`.
    pub uri: String,
    /// Username for basic auth.
    pub username: String,
    /// Password for basic auth.
    pub password: String,
    /// Database name sessions are scoped to.
    pub database: String,
}

/// Neo4j graph store.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect to Neo4j with the given settings.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let driver_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()?;
        let graph = Graph::connect(driver_config).await?;
        tracing::debug!(uri = %config.uri, db = %config.database, "driver configured");
        Ok(Self { graph })
    }
}

impl GraphStore for Neo4jStore {
    async fn run(&self, text: &str, params: &Map<String, JsonValue>) -> Result<Vec<Record>> {
        let mut q = query(text);
        for (name, value) in params {
            q = q.param(name, json_to_bolt(value)?);
        }

        tracing::debug!(query = text, "executing");
        let mut stream = self.graph.execute(q).await?;
        let mut records = Vec::new();
        while let Some(row) = stream.next().await? {
            let columns: HashMap<String, BoltType> =
                row.to().map_err(|e| crate::error::McpError::Store {
                    message: format!("failed to read result row: {}", e),
                })?;
            let mut record = Record::new();
            for (name, value) in &columns {
                record.insert(name.clone(), bolt_to_json(value));
            }
            records.push(record);
        }
        Ok(records)
    }

    async fn close(&self) -> Result<()> {
        // The pool returns idle connections on drop; nothing to flush.
        tracing::debug!("closing graph store");
        Ok(())
    }
}
