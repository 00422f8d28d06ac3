use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;

use crate::record::{EdgeRecord, NodeRecord};
use crate::style::{EdgeStyle, NodeTemplate};

/// A position in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `other`; `t` in `[0, 1]`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("edge {edge} references unknown node {endpoint}")]
    UnknownEndpoint { edge: String, endpoint: String },
}

/// A styled node in the visual model. `label` is the resolved display text,
/// `tag` the originating database record (tooltips read it).
#[derive(Debug, Clone)]
pub struct VisualNode {
    pub id: String,
    pub labels: Vec<String>,
    pub label: Option<String>,
    pub category: String,
    pub template: NodeTemplate,
    pub position: Point,
    pub tag: NodeRecord,
}

/// A styled edge in the visual model. `source` and `target` are node
/// display ids and always resolve while the edge is in a graph.
#[derive(Debug, Clone)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub tag: EdgeRecord,
}

/// The mutable state a rendering surface observes: insertion-ordered nodes
/// and edges plus adjacency in both directions.
///
/// Node insertion is an idempotent upsert; edge insertion rejects unknown
/// endpoints, so every stored edge's endpoints resolve at all times. The
/// graph is rebuilt from scratch on each load rather than edited in place.
#[derive(Debug)]
pub struct VisualGraph {
    nodes: IndexMap<String, VisualNode>,
    edges: IndexMap<String, VisualEdge>,
    outgoing: HashMap<String, Vec<String>>,
    incoming: HashMap<String, Vec<String>>,
}

impl VisualGraph {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        }
    }

    /// Insert or refresh a node, keyed by display id. A duplicate refreshes
    /// `labels`, `label` and `tag` in place but keeps the first insertion's
    /// category, template and position. Returns whether the node was new.
    pub fn insert_node(&mut self, node: VisualNode) -> bool {
        match self.nodes.get_mut(&node.id) {
            Some(existing) => {
                existing.labels = node.labels;
                existing.label = node.label;
                existing.tag = node.tag;
                false
            }
            None => {
                self.nodes.insert(node.id.clone(), node);
                true
            }
        }
    }

    /// Insert an edge whose endpoints must already be present. A duplicate
    /// edge id is a no-op returning `Ok(false)`.
    pub fn insert_edge(&mut self, edge: VisualEdge) -> Result<bool, ModelError> {
        if self.edges.contains_key(&edge.id) {
            return Ok(false);
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(ModelError::UnknownEndpoint {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.target.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
        self.edges.insert(edge.id.clone(), edge);
        Ok(true)
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
        self.nodes.values()
    }

    /// Node display ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &VisualEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Targets of edges leaving `id`, in edge insertion order. Duplicates
    /// appear once per parallel edge.
    pub fn neighbors_out(&self, id: &str) -> &[String] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sources of edges entering `id`, in edge insertion order.
    pub fn neighbors_in(&self, id: &str) -> &[String] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total degree of a node (out + in, parallel edges counted).
    pub fn degree(&self, id: &str) -> usize {
        self.neighbors_out(id).len() + self.neighbors_in(id).len()
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.nodes.get(id).map(|n| n.position)
    }

    /// Move a node. Returns false for an unknown id.
    pub fn set_position(&mut self, id: &str, position: Point) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Snapshot of all node positions, keyed by display id.
    pub fn positions(&self) -> HashMap<String, Point> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.position))
            .collect()
    }
}

impl Default for VisualGraph {
    fn default() -> Self {
        Self::new()
    }
}
