//! Pointer interaction: hover highlighting, double-click refocus, tooltips.
//!
//! The controller owns the transient UI state — the live highlight set and
//! the hover and focus phases — and turns [`PointerEvent`]s into graph
//! queries and layout requests. The two phases are orthogonal: hovering
//! while a morph is in flight is fine, and a double-click mid-morph simply
//! supersedes the previous focus.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::Notify;
use tracing::{debug, warn};

use graph_orbit_core::{format_value, reachable, VisualGraph};

use crate::animate::{LayoutOrchestrator, LayoutOutcome, LayoutRequest};
use crate::surface::{GraphItem, HoverConfig, PointerEvent, PointerEvents, RenderSurface};

/// Hover half of the interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    Hovering {
        node: String,
    },
}

/// Focus half: a refocus morph is in flight for `node`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusPhase {
    #[default]
    Idle,
    Focusing {
        node: String,
    },
}

#[derive(Debug, Clone)]
pub struct InteractionConfig {
    /// Follow edge direction when computing the highlight set.
    pub directed_reachability: bool,
    pub hover: HoverConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            directed_reachability: true,
            hover: HoverConfig::default(),
        }
    }
}

pub struct InteractionController<R> {
    graph: Rc<RefCell<VisualGraph>>,
    surface: Rc<R>,
    orchestrator: Rc<LayoutOrchestrator<R>>,
    config: InteractionConfig,
    hover: RefCell<HoverPhase>,
    focus: Rc<RefCell<FocusPhase>>,
    events: RefCell<Option<PointerEvents>>,
    stop: Notify,
}

impl<R: RenderSurface + 'static> InteractionController<R> {
    pub fn new(
        graph: Rc<RefCell<VisualGraph>>,
        surface: Rc<R>,
        orchestrator: Rc<LayoutOrchestrator<R>>,
        config: InteractionConfig,
    ) -> Self {
        Self {
            graph,
            surface,
            orchestrator,
            config,
            hover: RefCell::new(HoverPhase::Idle),
            focus: Rc::new(RefCell::new(FocusPhase::Idle)),
            events: RefCell::new(None),
            stop: Notify::new(),
        }
    }

    /// Apply the hover config to the surface and subscribe to its pointer
    /// events. Call once before pumping [`run`](Self::run).
    pub fn attach(&self) {
        self.surface.configure_hover(&self.config.hover);
        *self.events.borrow_mut() = Some(self.surface.subscribe_pointer_events());
    }

    /// Drop the subscription — ending an active [`run`](Self::run) pump —
    /// and clear every transient mark.
    pub fn detach(&self) {
        self.events.borrow_mut().take();
        self.stop.notify_waiters();
        self.surface.clear_highlights();
        *self.hover.borrow_mut() = HoverPhase::Idle;
    }

    pub fn hover_phase(&self) -> HoverPhase {
        self.hover.borrow().clone()
    }

    pub fn focus_phase(&self) -> FocusPhase {
        self.focus.borrow().clone()
    }

    /// Pump pointer events until the surface closes the stream or
    /// [`detach`](Self::detach) is called. Takes the subscription out of the
    /// controller, so `attach` must have run first; must run inside a
    /// `LocalSet` because double-clicks spawn the refocus morph as a local
    /// task.
    pub async fn run(&self) {
        let Some(mut events) = self.events.borrow_mut().take() else {
            return;
        };
        loop {
            tokio::select! {
                // detach wins over a queued event
                biased;
                _ = self.stop.notified() => break,
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => break,
                },
            }
        }
        debug!("pointer event stream ended");
    }

    /// Dispatch one pointer event. Returns true when the event is consumed
    /// in a way that should suppress the surface's default handling — only
    /// a double-click on a node is.
    pub fn handle_event(&self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::HoverChanged { item } => {
                match item.as_ref().and_then(GraphItem::node_id) {
                    Some(id) => self.hover_enter(id.to_string()),
                    None => self.hover_exit(),
                }
                false
            }
            PointerEvent::DoubleClicked { item } => match item {
                GraphItem::Node(id) => {
                    self.focus_on(id);
                    true
                }
                _ => false,
            },
        }
    }

    /// Clear the old marks, then highlight everything reachable from the
    /// hovered node. The node itself stays unmarked.
    fn hover_enter(&self, id: String) {
        self.surface.clear_highlights();
        let reached = reachable(&self.graph.borrow(), &id, self.config.directed_reachability);
        debug!(node = %id, reached = reached.len(), "hover enter");
        for node in &reached {
            self.surface.add_highlight(node);
        }
        *self.hover.borrow_mut() = HoverPhase::Hovering { node: id };
    }

    fn hover_exit(&self) {
        self.surface.clear_highlights();
        *self.hover.borrow_mut() = HoverPhase::Idle;
    }

    /// Kick off a refocus morph centered on `id`. Fire-and-forget: the
    /// morph runs as a local task and the focus phase tracks it.
    fn focus_on(&self, id: String) {
        debug!(node = %id, "double-click refocus");
        *self.focus.borrow_mut() = FocusPhase::Focusing { node: id.clone() };
        let orchestrator = self.orchestrator.clone();
        let focus = self.focus.clone();
        tokio::task::spawn_local(async move {
            match orchestrator.layout(LayoutRequest::focus(&id)).await {
                Ok(LayoutOutcome::Completed) => {}
                Ok(LayoutOutcome::Superseded) => {
                    // the newer request owns the focus phase now
                    return;
                }
                Err(e) => warn!(node = %id, error = %e, "refocus failed"),
            }
            // reset only while the phase still names this request; a newer
            // double-click owns it otherwise, failed requests included
            let mut focus = focus.borrow_mut();
            if matches!(&*focus, FocusPhase::Focusing { node } if *node == id) {
                *focus = FocusPhase::Idle;
            }
        });
    }

    /// Tooltip body for an item: one `name : value` line per property of
    /// the underlying record, in record order. `None` when there is nothing
    /// to show, so callers can skip the tooltip entirely.
    pub fn tooltip_for(&self, item: &GraphItem) -> Option<String> {
        let graph = self.graph.borrow();
        let properties = match item {
            GraphItem::Node(id) => &graph.node(id)?.tag.properties,
            GraphItem::Edge(id) => &graph.edge(id)?.tag.properties,
            GraphItem::Label(_) | GraphItem::Port(_) => return None,
        };
        if properties.is_empty() {
            return None;
        }
        Some(
            properties
                .iter()
                .map(|(name, value)| format!("{} : {}", name, format_value(value)))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceCall};
    use graph_orbit_core::{
        EdgeRecord, EdgeStyle, NodeRecord, NodeTemplate, Point, PropertyMap, RadialParams,
        VisualEdge, VisualNode,
    };
    use serde_json::json;
    use std::time::Duration;

    fn vnode(id: i64, properties: PropertyMap) -> VisualNode {
        let tag = NodeRecord {
            identity: id,
            labels: Vec::new(),
            properties,
        };
        VisualNode {
            id: tag.display_id(),
            labels: Vec::new(),
            label: None,
            category: "default".to_string(),
            template: NodeTemplate::default(),
            position: Point::ORIGIN,
            tag,
        }
    }

    fn graph_of(node_ids: &[i64], edges: &[(i64, i64, i64)]) -> VisualGraph {
        let mut g = VisualGraph::new();
        for &id in node_ids {
            g.insert_node(vnode(id, PropertyMap::new()));
        }
        for &(id, start, end) in edges {
            let tag = EdgeRecord {
                identity: id,
                start,
                end,
                rel_type: "NEXT".to_string(),
                properties: PropertyMap::new(),
            };
            g.insert_edge(VisualEdge {
                id: tag.display_id(),
                source: tag.start_id(),
                target: tag.end_id(),
                label: None,
                style: EdgeStyle::default(),
                tag,
            })
            .unwrap();
        }
        g
    }

    fn controller_over(
        graph: VisualGraph,
        config: InteractionConfig,
    ) -> (Rc<RecordingSurface>, Rc<InteractionController<RecordingSurface>>) {
        let graph = Rc::new(RefCell::new(graph));
        let surface = Rc::new(RecordingSurface::new());
        let orchestrator = Rc::new(LayoutOrchestrator::new(
            graph.clone(),
            surface.clone(),
            RadialParams::default(),
            Duration::from_millis(30),
            Duration::from_millis(10),
        ));
        let controller = Rc::new(InteractionController::new(
            graph,
            surface.clone(),
            orchestrator,
            config,
        ));
        (surface, controller)
    }

    fn hover(id: &str) -> PointerEvent {
        PointerEvent::HoverChanged {
            item: Some(GraphItem::Node(id.to_string())),
        }
    }

    fn hover_none() -> PointerEvent {
        PointerEvent::HoverChanged { item: None }
    }

    #[test]
    fn test_hover_highlights_downstream_nodes() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        let handled = controller.handle_event(hover("0"));
        assert!(!handled);
        assert_eq!(surface.highlighted(), ["1", "2"]);
        assert_eq!(
            controller.hover_phase(),
            HoverPhase::Hovering {
                node: "0".to_string()
            }
        );
        // clear always precedes the new marks
        assert_eq!(surface.calls()[0], SurfaceCall::ClearHighlights);
    }

    #[test]
    fn test_switching_hover_replaces_the_set() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        controller.handle_event(hover("0"));
        controller.handle_event(hover("1"));
        // only node 1's downstream set remains
        assert_eq!(surface.highlighted(), ["2"]);
    }

    #[test]
    fn test_hover_exit_clears_everything() {
        let g = graph_of(&[0, 1], &[(100, 0, 1)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        controller.handle_event(hover("0"));
        controller.handle_event(hover_none());
        assert!(surface.highlighted().is_empty());
        assert_eq!(controller.hover_phase(), HoverPhase::Idle);
    }

    #[test]
    fn test_non_node_hover_acts_as_exit() {
        let g = graph_of(&[0, 1], &[(100, 0, 1)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        controller.handle_event(hover("0"));
        let handled = controller.handle_event(PointerEvent::HoverChanged {
            item: Some(GraphItem::Edge("100".to_string())),
        });
        assert!(!handled);
        assert!(surface.highlighted().is_empty());
        assert_eq!(controller.hover_phase(), HoverPhase::Idle);
    }

    #[test]
    fn test_cycle_hover_excludes_the_hovered_node() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2), (102, 2, 0)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        controller.handle_event(hover("0"));
        assert_eq!(surface.highlighted(), ["1", "2"]);
    }

    #[test]
    fn test_undirected_hover_walks_both_ways() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2)]);
        let config = InteractionConfig {
            directed_reachability: false,
            ..InteractionConfig::default()
        };
        let (surface, controller) = controller_over(g, config);

        controller.handle_event(hover("1"));
        let mut marked = surface.highlighted();
        marked.sort();
        assert_eq!(marked, ["0", "2"]);
    }

    #[test]
    fn test_hover_on_unknown_node_marks_nothing() {
        let g = graph_of(&[0], &[]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());
        controller.handle_event(hover("42"));
        assert!(surface.highlighted().is_empty());
        assert_eq!(
            controller.hover_phase(),
            HoverPhase::Hovering {
                node: "42".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_double_click_recenter_on_the_node() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2)]);
        let (_surface, controller) = controller_over(g, InteractionConfig::default());
        let graph = controller.graph.clone();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let handled = controller.handle_event(PointerEvent::DoubleClicked {
                    item: GraphItem::Node("2".to_string()),
                });
                assert!(handled);
                assert_eq!(
                    controller.focus_phase(),
                    FocusPhase::Focusing {
                        node: "2".to_string()
                    }
                );
                tokio::time::sleep(Duration::from_millis(80)).await;
            })
            .await;

        assert_eq!(controller.focus_phase(), FocusPhase::Idle);
        assert_eq!(graph.borrow().position("2"), Some(Point::ORIGIN));
    }

    #[tokio::test]
    async fn test_double_click_on_edge_is_ignored() {
        let g = graph_of(&[0, 1], &[(100, 0, 1)]);
        let (_surface, controller) = controller_over(g, InteractionConfig::default());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let handled = controller.handle_event(PointerEvent::DoubleClicked {
                    item: GraphItem::Edge("100".to_string()),
                });
                assert!(!handled);
                assert_eq!(controller.focus_phase(), FocusPhase::Idle);
            })
            .await;
    }

    #[tokio::test]
    async fn test_stale_refocus_failure_leaves_the_newer_focus() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2)]);
        let (_surface, controller) = controller_over(g, InteractionConfig::default());
        let graph = controller.graph.clone();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                // a click on a node the graph no longer holds (raced with a
                // reload), with a valid one right behind it
                controller.handle_event(PointerEvent::DoubleClicked {
                    item: GraphItem::Node("99".to_string()),
                });
                controller.handle_event(PointerEvent::DoubleClicked {
                    item: GraphItem::Node("2".to_string()),
                });

                tokio::time::sleep(Duration::from_millis(5)).await;
                // the failed stale request must not reset the phase the
                // newer morph owns
                assert_eq!(
                    controller.focus_phase(),
                    FocusPhase::Focusing {
                        node: "2".to_string()
                    }
                );
                tokio::time::sleep(Duration::from_millis(80)).await;
            })
            .await;

        assert_eq!(controller.focus_phase(), FocusPhase::Idle);
        assert_eq!(graph.borrow().position("2"), Some(Point::ORIGIN));
    }

    #[tokio::test]
    async fn test_run_pumps_until_the_stream_closes() {
        let g = graph_of(&[0, 1], &[(100, 0, 1)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                controller.attach();
                let pump = tokio::task::spawn_local({
                    let controller = controller.clone();
                    async move { controller.run().await }
                });

                surface.emit(hover("0"));
                tokio::time::sleep(Duration::from_millis(5)).await;
                assert_eq!(surface.highlighted(), ["1"]);

                surface.close_pointer_events();
                pump.await.unwrap();
            })
            .await;
    }

    #[test]
    fn test_detach_clears_marks_and_subscription() {
        let g = graph_of(&[0, 1], &[(100, 0, 1)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        controller.attach();
        controller.handle_event(hover("0"));
        assert_eq!(surface.highlighted(), ["1"]);

        controller.detach();
        assert!(surface.highlighted().is_empty());
        assert_eq!(controller.hover_phase(), HoverPhase::Idle);
    }

    #[tokio::test]
    async fn test_detach_ends_an_active_pump() {
        let g = graph_of(&[0, 1, 2], &[(100, 0, 1), (101, 1, 2)]);
        let (surface, controller) = controller_over(g, InteractionConfig::default());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                controller.attach();
                let pump = tokio::task::spawn_local({
                    let controller = controller.clone();
                    async move { controller.run().await }
                });
                // let the pump park on the subscription
                tokio::time::sleep(Duration::from_millis(1)).await;

                controller.detach();
                pump.await.unwrap();

                // the subscription is gone; a later pointer event falls on
                // a closed channel and changes nothing
                surface.emit(hover("0"));
                tokio::time::sleep(Duration::from_millis(1)).await;
                assert!(surface.highlighted().is_empty());
                assert_eq!(controller.hover_phase(), HoverPhase::Idle);
            })
            .await;
    }

    #[test]
    fn test_attach_applies_the_hover_config() {
        let g = graph_of(&[0], &[]);
        let config = InteractionConfig {
            hover: HoverConfig {
                nodes_only: false,
                ..HoverConfig::default()
            },
            ..InteractionConfig::default()
        };
        let (surface, controller) = controller_over(g, config);

        controller.attach();
        assert!(!surface.hover_config().nodes_only);
    }

    #[test]
    fn test_tooltip_lists_properties_in_record_order() {
        let mut properties = PropertyMap::new();
        properties.insert("title".to_string(), json!("The Matrix"));
        properties.insert("released".to_string(), json!(1999));
        let mut g = VisualGraph::new();
        g.insert_node(vnode(1, properties));

        let (_surface, controller) = controller_over(g, InteractionConfig::default());
        let tooltip = controller.tooltip_for(&GraphItem::Node("1".to_string()));
        assert_eq!(tooltip.as_deref(), Some("title : The Matrix\nreleased : 1999"));
    }

    #[test]
    fn test_tooltip_is_empty_for_bare_items() {
        let g = graph_of(&[0, 1], &[(100, 0, 1)]);
        let (_surface, controller) = controller_over(g, InteractionConfig::default());

        // no properties on the node or the edge
        assert_eq!(controller.tooltip_for(&GraphItem::Node("0".to_string())), None);
        assert_eq!(controller.tooltip_for(&GraphItem::Edge("100".to_string())), None);
        // labels, ports and unknown ids never get one
        assert_eq!(controller.tooltip_for(&GraphItem::Label("0".to_string())), None);
        assert_eq!(controller.tooltip_for(&GraphItem::Port("0".to_string())), None);
        assert_eq!(controller.tooltip_for(&GraphItem::Node("42".to_string())), None);
    }

    #[test]
    fn test_edge_tooltip_reads_the_edge_record() {
        let mut g = graph_of(&[0, 1], &[]);
        let mut properties = PropertyMap::new();
        properties.insert("roles".to_string(), json!("Neo"));
        let tag = EdgeRecord {
            identity: 100,
            start: 0,
            end: 1,
            rel_type: "ACTED_IN".to_string(),
            properties,
        };
        g.insert_edge(VisualEdge {
            id: tag.display_id(),
            source: tag.start_id(),
            target: tag.end_id(),
            label: None,
            style: EdgeStyle::default(),
            tag,
        })
        .unwrap();

        let (_surface, controller) = controller_over(g, InteractionConfig::default());
        let tooltip = controller.tooltip_for(&GraphItem::Edge("100".to_string()));
        assert_eq!(tooltip.as_deref(), Some("roles : Neo"));
    }
}
