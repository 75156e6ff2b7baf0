//! Graph store abstraction.
//!
//! Defines the [`GraphStore`] trait the dispatcher is written against,
//! plus the Neo4j implementation. The store is an opaque "run a query,
//! get rows" service; everything above it only sees serialized rows.

pub mod neo4j;

use serde_json::{Map, Value as JsonValue};

use crate::error::Result;

pub use neo4j::{Neo4jConfig, Neo4jStore};

/// A single result row: column name to serialized wire value.
pub type Record = Map<String, JsonValue>;

/// A graph database backend.
///
/// Each `run` call uses exactly one session for exactly one query and
/// releases it before returning, on the error path included. Tests
/// substitute an in-memory double for fault injection.
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    /// Execute a query with bound parameters and return serialized rows.
    async fn run(&self, text: &str, params: &Map<String, JsonValue>) -> Result<Vec<Record>>;

    /// Release driver resources. Called once at shutdown.
    async fn close(&self) -> Result<()>;
}

impl<T: GraphStore> GraphStore for std::sync::Arc<T> {
    async fn run(&self, text: &str, params: &Map<String, JsonValue>) -> Result<Vec<Record>> {
        (**self).run(text, params).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
