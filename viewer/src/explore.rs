//! The explorer façade.
//!
//! Wires the source, the builder, the orchestrator and the controller
//! together and runs the load flow: scan a bounded set of nodes, fetch the
//! edges among them, rebuild the visual graph, present it, and morph into
//! the default radial layout. Strictly sequential — a failing query aborts
//! the flow and no partial graph reaches the surface.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use serde_json::json;
use thiserror::Error;
use tracing::info;

use graph_orbit_core::{
    EdgeRecord, GraphBuilder, GraphTemplate, LayoutError, NodeRecord, RadialParams, VisualGraph,
};

use crate::animate::{LayoutOrchestrator, LayoutRequest};
use crate::config::{ConfigError, ExplorerConfig};
use crate::interaction::{InteractionConfig, InteractionController};
use crate::source::{
    edge_query, node_query, run_query, GraphSource, Params, SourceError, EDGE_FIELD, NODE_FIELD,
    NODE_IDS_PARAM,
};
use crate::status::{ExplorerStatus, LoadStats};
use crate::surface::RenderSurface;

#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("graph source: {0}")]
    Source(#[from] SourceError),
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
}

pub struct Explorer<S, R> {
    source: S,
    surface: Rc<R>,
    builder: GraphBuilder,
    config: ExplorerConfig,
    graph: Rc<RefCell<VisualGraph>>,
    orchestrator: Rc<LayoutOrchestrator<R>>,
    controller: Rc<InteractionController<R>>,
    last_load: RefCell<Option<LoadStats>>,
}

impl<S, R> Explorer<S, R>
where
    S: GraphSource,
    R: RenderSurface + 'static,
{
    /// Wire an explorer from its collaborators. Fails fast on an invalid
    /// config; nothing touches the source or the surface yet.
    pub fn new(
        source: S,
        surface: R,
        template: GraphTemplate,
        config: ExplorerConfig,
    ) -> Result<Self, ExploreError> {
        config.validate()?;
        let surface = Rc::new(surface);
        let graph = Rc::new(RefCell::new(VisualGraph::new()));
        let params = RadialParams {
            layer_spacing: config.layer_spacing,
            ..RadialParams::default()
        };
        let orchestrator = Rc::new(LayoutOrchestrator::new(
            graph.clone(),
            surface.clone(),
            params,
            config.morph_duration,
            config.frame_interval,
        ));
        let controller = Rc::new(InteractionController::new(
            graph.clone(),
            surface.clone(),
            orchestrator.clone(),
            InteractionConfig {
                directed_reachability: config.directed_reachability,
                hover: config.hover.clone(),
            },
        ));
        Ok(Self {
            source,
            surface,
            builder: GraphBuilder::new(template),
            config,
            graph,
            orchestrator,
            controller,
            last_load: RefCell::new(None),
        })
    }

    /// Fetch a bounded neighborhood and show it. The node scan runs first;
    /// its identities parameterize the edge match (skipped entirely when the
    /// scan comes back empty). The rebuilt graph replaces the shared one,
    /// the surface gets a full present, and the default radial morph runs to
    /// completion before the call returns.
    pub async fn load(&self) -> Result<LoadStats, ExploreError> {
        let started = Instant::now();

        let rows = run_query(
            &self.source,
            &node_query(self.config.node_limit),
            &Params::new(),
        )
        .await?;
        let nodes: Vec<NodeRecord> = rows
            .iter()
            .filter_map(|row| row.node(NODE_FIELD))
            .cloned()
            .collect();

        let identities: Vec<i64> = nodes.iter().map(|n| n.identity).collect();
        let edges: Vec<EdgeRecord> = if identities.is_empty() {
            Vec::new()
        } else {
            let mut params = Params::new();
            params.insert(NODE_IDS_PARAM.to_string(), json!(identities));
            run_query(&self.source, &edge_query(self.config.edge_limit), &params)
                .await?
                .iter()
                .filter_map(|row| row.edge(EDGE_FIELD))
                .cloned()
                .collect()
        };

        let (graph, report) = self.builder.build(&nodes, &edges);
        *self.graph.borrow_mut() = graph;
        self.surface.present(&self.graph.borrow());

        self.orchestrator.layout(LayoutRequest::automatic()).await?;

        let stats = LoadStats {
            node_records: nodes.len(),
            edge_records: edges.len(),
            nodes: self.graph.borrow().node_count(),
            edges: self.graph.borrow().edge_count(),
            edges_skipped: report.edges_skipped,
            elapsed: started.elapsed(),
        };
        info!(
            nodes = stats.nodes,
            edges = stats.edges,
            skipped = stats.edges_skipped,
            elapsed_ms = format_args!("{:.1}", stats.elapsed.as_secs_f64() * 1000.0),
            "graph loaded"
        );
        *self.last_load.borrow_mut() = Some(stats.clone());
        Ok(stats)
    }

    /// The interaction controller. Attach it and pump
    /// [`run`](InteractionController::run) to make the surface live.
    pub fn controller(&self) -> Rc<InteractionController<R>> {
        self.controller.clone()
    }

    pub fn orchestrator(&self) -> Rc<LayoutOrchestrator<R>> {
        self.orchestrator.clone()
    }

    /// The shared visual graph.
    pub fn graph(&self) -> Rc<RefCell<VisualGraph>> {
        self.graph.clone()
    }

    pub fn surface(&self) -> Rc<R> {
        self.surface.clone()
    }

    pub fn status(&self) -> ExplorerStatus {
        let graph = self.graph.borrow();
        let last_load = self.last_load.borrow().clone();
        ExplorerStatus {
            loaded: last_load.is_some(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            edges_skipped: last_load.as_ref().map(|s| s.edges_skipped).unwrap_or(0),
            animating: self.orchestrator.is_animating(),
            last_load,
        }
    }
}
