//! The graph database boundary.
//!
//! The engine never opens connections on its own: a fully configured client
//! is handed in behind [`GraphSource`], and every query runs inside a scoped
//! session that is closed whether the query succeeded or failed. Rows carry
//! typed values, so a statement returning nodes under one field and edges
//! under another maps straight onto the record types.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use graph_orbit_core::{EdgeRecord, NodeRecord};

/// Result field holding node records in the default scan statement.
pub const NODE_FIELD: &str = "node";
/// Result field holding edge records in the default edge statement.
pub const EDGE_FIELD: &str = "edge";
/// Parameter naming the node identities the edge statement may touch.
pub const NODE_IDS_PARAM: &str = "nodeIds";

/// Query parameters, keyed by name.
pub type Params = serde_json::Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("failed to open session: {0}")]
    Connect(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("failed to close session: {0}")]
    Close(String),
}

/// One typed value in a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Node(NodeRecord),
    Edge(EdgeRecord),
}

/// One result row: named fields in result order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRow {
    fields: IndexMap<String, QueryValue>,
}

impl QueryRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row with a single field.
    pub fn single(field: &str, value: QueryValue) -> Self {
        let mut row = Self::new();
        row.fields.insert(field.to_string(), value);
        row
    }

    pub fn insert(&mut self, field: &str, value: QueryValue) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&QueryValue> {
        self.fields.get(field)
    }

    /// The node under `field`, if the field exists and holds one.
    pub fn node(&self, field: &str) -> Option<&NodeRecord> {
        match self.fields.get(field) {
            Some(QueryValue::Node(record)) => Some(record),
            _ => None,
        }
    }

    /// The edge under `field`, if the field exists and holds one.
    pub fn edge(&self, field: &str) -> Option<&EdgeRecord> {
        match self.fields.get(field) {
            Some(QueryValue::Edge(record)) => Some(record),
            _ => None,
        }
    }
}

/// A configured graph database client. Sessions are cheap and short-lived;
/// the engine opens one per statement.
#[async_trait(?Send)]
pub trait GraphSource {
    async fn open_session(&self) -> Result<Box<dyn QuerySession>, SourceError>;
}

/// An open session. Callers must `close` it when done, on the failure path
/// too; [`run_query`] wraps the discipline.
#[async_trait(?Send)]
pub trait QuerySession {
    async fn run(&mut self, query: &str, params: &Params) -> Result<Vec<QueryRow>, SourceError>;
    async fn close(&mut self) -> Result<(), SourceError>;
}

/// Open a session, run one statement, close the session. The session is
/// closed even when the statement fails, and the statement's error wins over
/// any close error.
pub async fn run_query<S>(
    source: &S,
    query: &str,
    params: &Params,
) -> Result<Vec<QueryRow>, SourceError>
where
    S: GraphSource + ?Sized,
{
    let mut session = source.open_session().await?;
    let result = session.run(query, params).await;
    let closed = session.close().await;
    let rows = result?;
    closed?;
    Ok(rows)
}

/// The bounded node scan: every node, capped.
pub fn node_query(limit: usize) -> String {
    format!("MATCH (node) RETURN node LIMIT {limit}")
}

/// Edges whose two endpoints are both in the `nodeIds` parameter, distinct,
/// capped. Undirected match, so each stored edge appears once regardless of
/// which endpoint the pattern binds first.
pub fn edge_query(limit: usize) -> String {
    format!(
        "MATCH (n)-[edge]-(m) WHERE id(n) IN $nodeIds AND id(m) IN $nodeIds \
         RETURN DISTINCT edge LIMIT {limit}"
    )
}
