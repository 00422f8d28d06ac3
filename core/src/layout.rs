//! Radial layout solver.
//!
//! Positions nodes on concentric rings around one or more center nodes:
//! ring index is the hop count to the nearest center over the undirected
//! structure, and each spanning-forest subtree gets an angular span
//! proportional to its size. Pure function of the graph and the request;
//! the caller decides whether to snap or animate toward the result.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::model::{Point, VisualGraph};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// How the solver picks its center nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CenterPolicy {
    /// One center: the node with the highest total degree, ties broken by
    /// insertion order.
    Automatic,
    /// Explicit center ids, e.g. the node the user double-clicked. An empty
    /// list behaves like `Automatic`; duplicates collapse to one entry.
    Custom(Vec<String>),
}

impl CenterPolicy {
    /// Single explicit center.
    pub fn focus(id: &str) -> Self {
        CenterPolicy::Custom(vec![id.to_string()])
    }
}

/// Solver tuning.
#[derive(Debug, Clone)]
pub struct RadialParams {
    /// Distance between consecutive rings.
    pub layer_spacing: f32,
    /// Angle where the first span starts, in radians.
    pub start_angle: f32,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            layer_spacing: 100.0,
            start_angle: 0.0,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("center node {0} is not in the graph")]
    UnknownCenter(String),
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Compute radial positions for every node in `graph`.
///
/// A single center sits exactly at the origin; with several centers the
/// innermost ring is pushed out by half a layer so no two centers collide.
/// Nodes unreachable from every center are attached under the first center
/// at depth 1, keeping their own components intact below them. Deterministic
/// for a given graph and request.
pub fn compute_radial(
    graph: &VisualGraph,
    policy: &CenterPolicy,
    params: &RadialParams,
) -> Result<HashMap<String, Point>, LayoutError> {
    if graph.is_empty() {
        return Ok(HashMap::new());
    }
    let centers = resolve_centers(graph, policy)?;
    let forest = spanning_forest(graph, &centers);
    Ok(place(&forest, &centers, params))
}

fn resolve_centers(
    graph: &VisualGraph,
    policy: &CenterPolicy,
) -> Result<Vec<String>, LayoutError> {
    let explicit = match policy {
        CenterPolicy::Automatic => &[][..],
        CenterPolicy::Custom(ids) => ids.as_slice(),
    };
    if explicit.is_empty() {
        let mut best: Option<(&str, usize)> = None;
        for node in graph.nodes() {
            let degree = graph.degree(&node.id);
            match best {
                Some((_, top)) if degree <= top => {}
                _ => best = Some((&node.id, degree)),
            }
        }
        // the graph is non-empty here, so a best node exists
        return Ok(best.into_iter().map(|(id, _)| id.to_string()).collect());
    }
    let mut seen = HashSet::new();
    let mut centers = Vec::new();
    for id in explicit {
        if !graph.contains_node(id) {
            return Err(LayoutError::UnknownCenter(id.clone()));
        }
        if seen.insert(id.as_str()) {
            centers.push(id.clone());
        }
    }
    Ok(centers)
}

// ---------------------------------------------------------------------------
// Spanning forest
// ---------------------------------------------------------------------------

struct Forest {
    /// Parent id to children in discovery order.
    children: HashMap<String, Vec<String>>,
    /// Hop count to the nearest center.
    depth: HashMap<String, u32>,
    /// Breadth-first discovery order, centers first. Parents always precede
    /// their children.
    order: Vec<String>,
}

/// Multi-source BFS over the undirected structure. Iterative throughout so
/// a long chain cannot blow the stack.
fn spanning_forest(graph: &VisualGraph, centers: &[String]) -> Forest {
    let mut forest = Forest {
        children: HashMap::new(),
        depth: HashMap::with_capacity(graph.node_count()),
        order: Vec::with_capacity(graph.node_count()),
    };
    let mut queue = VecDeque::new();

    for center in centers {
        forest.depth.insert(center.clone(), 0);
        forest.order.push(center.clone());
        queue.push_back(center.clone());
    }
    expand(graph, &mut queue, &mut forest);

    // nodes no center can reach hang under the first center at depth 1,
    // each bringing its own component along
    let root = centers[0].clone();
    let detached: Vec<String> = graph
        .node_ids()
        .filter(|id| !forest.depth.contains_key(*id))
        .map(str::to_string)
        .collect();
    for id in detached {
        if forest.depth.contains_key(&id) {
            continue;
        }
        forest.depth.insert(id.clone(), 1);
        forest.children.entry(root.clone()).or_default().push(id.clone());
        forest.order.push(id.clone());
        queue.push_back(id);
        expand(graph, &mut queue, &mut forest);
    }

    forest
}

fn expand(graph: &VisualGraph, queue: &mut VecDeque<String>, forest: &mut Forest) {
    while let Some(current) = queue.pop_front() {
        let next_depth = forest.depth[&current] + 1;
        let neighbors = graph
            .neighbors_out(&current)
            .iter()
            .chain(graph.neighbors_in(&current).iter());
        for next in neighbors {
            if forest.depth.contains_key(next.as_str()) {
                continue;
            }
            forest.depth.insert(next.clone(), next_depth);
            forest
                .children
                .entry(current.clone())
                .or_default()
                .push(next.clone());
            forest.order.push(next.clone());
            queue.push_back(next.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

fn place(forest: &Forest, centers: &[String], params: &RadialParams) -> HashMap<String, Point> {
    let full = std::f32::consts::TAU;

    // subtree sizes: discovery order lists parents before children, so a
    // reverse sweep sums each node's children before the node itself
    let mut size: HashMap<&str, usize> = HashMap::with_capacity(forest.order.len());
    for id in forest.order.iter().rev() {
        let below: usize = forest
            .children
            .get(id.as_str())
            .map(|kids| kids.iter().map(|kid| size[kid.as_str()]).sum())
            .unwrap_or(0);
        size.insert(id, below + 1);
    }

    // the full circle is split among the centers by subtree weight, then
    // each parent's span among its children the same way
    let mut span: HashMap<&str, (f32, f32)> = HashMap::with_capacity(forest.order.len());
    let total: usize = centers.iter().map(|c| size[c.as_str()]).sum();
    let mut cursor = params.start_angle;
    for center in centers {
        let width = full * size[center.as_str()] as f32 / total as f32;
        span.insert(center.as_str(), (cursor, width));
        cursor += width;
    }
    for id in &forest.order {
        let kids = match forest.children.get(id.as_str()) {
            Some(kids) => kids,
            None => continue,
        };
        let (start, width) = span[id.as_str()];
        let weight: usize = kids.iter().map(|kid| size[kid.as_str()]).sum();
        let mut cursor = start;
        for kid in kids {
            let slice = width * size[kid.as_str()] as f32 / weight as f32;
            span.insert(kid.as_str(), (cursor, slice));
            cursor += slice;
        }
    }

    // with several centers the innermost ring sits half a layer out so the
    // centers themselves spread apart
    let ring_offset = if centers.len() > 1 {
        params.layer_spacing / 2.0
    } else {
        0.0
    };
    let mut positions = HashMap::with_capacity(forest.order.len());
    for id in &forest.order {
        let radius = forest.depth[id.as_str()] as f32 * params.layer_spacing + ring_offset;
        let point = if radius == 0.0 {
            Point::ORIGIN
        } else {
            let (start, width) = span[id.as_str()];
            let angle = start + width / 2.0;
            Point::new(radius * angle.cos(), radius * angle.sin())
        };
        positions.insert(id.clone(), point);
    }
    positions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
