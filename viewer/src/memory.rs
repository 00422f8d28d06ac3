//! In-memory [`GraphSource`] for tests and headless runs.
//!
//! Understands exactly the two statements the engine issues — the bounded
//! node scan and the endpoint-filtered edge match — and keeps counters so
//! tests can assert the session discipline: every opened session gets
//! closed, success or failure.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use graph_orbit_core::{EdgeRecord, NodeRecord};

use crate::source::{
    GraphSource, Params, QueryRow, QuerySession, QueryValue, SourceError, EDGE_FIELD, NODE_FIELD,
    NODE_IDS_PARAM,
};

#[derive(Default)]
struct MemoryInner {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    sessions_opened: Cell<usize>,
    sessions_closed: Cell<usize>,
    queries_run: Cell<usize>,
    fail_next_query: Cell<bool>,
}

/// Cloning shares the record set and the counters.
#[derive(Clone, Default)]
pub struct MemorySource {
    inner: Rc<MemoryInner>,
}

impl MemorySource {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self {
            inner: Rc::new(MemoryInner {
                nodes,
                edges,
                ..MemoryInner::default()
            }),
        }
    }

    /// Make the next `run` call fail with a query error.
    pub fn fail_next_query(&self) {
        self.inner.fail_next_query.set(true);
    }

    pub fn sessions_opened(&self) -> usize {
        self.inner.sessions_opened.get()
    }

    pub fn sessions_closed(&self) -> usize {
        self.inner.sessions_closed.get()
    }

    pub fn queries_run(&self) -> usize {
        self.inner.queries_run.get()
    }
}

#[async_trait(?Send)]
impl GraphSource for MemorySource {
    async fn open_session(&self) -> Result<Box<dyn QuerySession>, SourceError> {
        self.inner.sessions_opened.set(self.inner.sessions_opened.get() + 1);
        Ok(Box::new(MemorySession {
            inner: self.inner.clone(),
        }))
    }
}

struct MemorySession {
    inner: Rc<MemoryInner>,
}

#[async_trait(?Send)]
impl QuerySession for MemorySession {
    async fn run(&mut self, query: &str, params: &Params) -> Result<Vec<QueryRow>, SourceError> {
        self.inner.queries_run.set(self.inner.queries_run.get() + 1);
        if self.inner.fail_next_query.take() {
            return Err(SourceError::Query("injected failure".to_string()));
        }
        let limit = parse_limit(query)
            .ok_or_else(|| SourceError::Query(format!("unsupported statement: {query}")))?;

        if query.starts_with("MATCH (node)") {
            Ok(self
                .inner
                .nodes
                .iter()
                .take(limit)
                .map(|n| QueryRow::single(NODE_FIELD, QueryValue::Node(n.clone())))
                .collect())
        } else if query.contains("-[edge]-") {
            let ids: HashSet<i64> = params
                .get(NODE_IDS_PARAM)
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(Value::as_i64).collect())
                .unwrap_or_default();
            let mut seen = HashSet::new();
            Ok(self
                .inner
                .edges
                .iter()
                .filter(|e| ids.contains(&e.start) && ids.contains(&e.end))
                .filter(|e| seen.insert(e.identity))
                .take(limit)
                .map(|e| QueryRow::single(EDGE_FIELD, QueryValue::Edge(e.clone())))
                .collect())
        } else {
            Err(SourceError::Query(format!("unsupported statement: {query}")))
        }
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        self.inner.sessions_closed.set(self.inner.sessions_closed.get() + 1);
        Ok(())
    }
}

fn parse_limit(query: &str) -> Option<usize> {
    query
        .rsplit_once("LIMIT")
        .and_then(|(_, tail)| tail.trim().parse().ok())
}
