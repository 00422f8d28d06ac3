//! Introspection: load counters and a one-line status snapshot.

use std::fmt;
use std::time::Duration;

/// Counters and timing from one load pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Node records the scan returned.
    pub node_records: usize,
    /// Edge records the edge match returned.
    pub edge_records: usize,
    /// Nodes in the built graph.
    pub nodes: usize,
    /// Edges in the built graph.
    pub edges: usize,
    /// Edge records dropped for referencing a missing endpoint.
    pub edges_skipped: usize,
    pub elapsed: Duration,
}

/// Point-in-time snapshot of the explorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerStatus {
    pub loaded: bool,
    pub nodes: usize,
    pub edges: usize,
    pub edges_skipped: usize,
    /// Whether a layout morph is advancing right now.
    pub animating: bool,
    pub last_load: Option<LoadStats>,
}

impl fmt::Display for ExplorerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.loaded {
            return write!(f, "status=not_loaded");
        }
        write!(
            f,
            "status=loaded nodes={} edges={} skipped={} animating={}",
            self.nodes, self.edges, self.edges_skipped, self.animating
        )?;
        if let Some(stats) = &self.last_load {
            write!(f, " load_ms={:.1}", stats.elapsed.as_secs_f64() * 1000.0)?;
        }
        Ok(())
    }
}
