use std::collections::{HashSet, VecDeque};

use crate::model::VisualGraph;

/// Display ids of every node reachable from `start` over the current edge
/// set, in breadth-first discovery order. The start node itself is never in
/// the result, not even when a cycle leads back to it.
///
/// Directed mode follows outgoing edges only; undirected mode follows both
/// directions. An unknown or isolated start yields an empty set. Pure and
/// synchronous — it runs on the hover path and must never await.
pub fn reachable(graph: &VisualGraph, start: &str, directed: bool) -> Vec<String> {
    let mut result = Vec::new();
    if !graph.contains_node(start) {
        return result;
    }

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start);
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors_out(current) {
            if visited.insert(next) {
                result.push(next.clone());
                queue.push_back(next);
            }
        }
        if !directed {
            for next in graph.neighbors_in(current) {
                if visited.insert(next) {
                    result.push(next.clone());
                    queue.push_back(next);
                }
            }
        }
    }
    result
}
