//! Graph client operations.
//!
//! [`GraphClient`] owns the store handle and exposes the operations the
//! tools dispatch to. It is constructed once at startup and passed into
//! the server explicitly; there is no ambient connection state.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};
use crate::store::{GraphStore, Record};

/// Client over a graph store.
pub struct GraphClient<S> {
    store: S,
}

impl<S: GraphStore> GraphClient<S> {
    /// Create a client over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run a read query and return serialized rows.
    ///
    /// Read intent is a trust boundary, not a technical guarantee: the
    /// store does not gate reads from writes at this layer.
    pub async fn run_query(
        &self,
        text: &str,
        params: &Map<String, JsonValue>,
    ) -> Result<Vec<Record>> {
        self.store.run(text, params).await
    }

    /// Run a mutation. Identical to [`run_query`](Self::run_query); the
    /// distinction is advisory, for callers that track write intent.
    pub async fn run_mutation(
        &self,
        text: &str,
        params: &Map<String, JsonValue>,
    ) -> Result<Vec<Record>> {
        self.store.run(text, params).await
    }

    /// Verify connectivity with a no-op round-trip query.
    ///
    /// Called once at startup; failure here is fatal and the server does
    /// not begin serving.
    pub async fn verify_connectivity(&self) -> Result<()> {
        let rows = self
            .store
            .run("RETURN 'Neo4j connected' AS status", &Map::new())
            .await?;
        if rows.is_empty() {
            return Err(McpError::Store {
                message: "connectivity check returned no rows".to_string(),
            });
        }
        Ok(())
    }

    /// Enumerate node labels and relationship types.
    pub async fn get_schema(&self) -> Result<JsonValue> {
        let labels = self.enumerate("CALL db.labels()", "label").await?;
        let relationship_types = self
            .enumerate("CALL db.relationshipTypes()", "relationshipType")
            .await?;
        Ok(serde_json::json!({
            "labels": labels,
            "relationshipTypes": relationship_types,
        }))
    }

    /// Run a fixed introspection query and pull one column out of each
    /// row, tolerating stores that return bare scalars instead of the
    /// named column.
    async fn enumerate(&self, text: &str, column: &str) -> Result<Vec<JsonValue>> {
        let rows = self.store.run(text, &Map::new()).await?;
        Ok(rows
            .into_iter()
            .map(|mut row| match row.remove(column) {
                Some(value) => value,
                // A store that names the column differently but returns a
                // single value per row still enumerates cleanly.
                None if row.len() == 1 => {
                    row.into_iter().next().map(|(_, v)| v).unwrap_or(JsonValue::Null)
                }
                None => JsonValue::Object(row),
            })
            .collect())
    }

    /// Release the underlying store.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}
