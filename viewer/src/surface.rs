//! The rendering boundary.
//!
//! The engine owns the model and the interaction logic; drawing belongs to
//! whatever sits behind [`RenderSurface`]. Pointer input flows the other
//! way as a subscription of [`PointerEvent`]s. [`RecordingSurface`] is the
//! in-process implementation used by tests and headless runs: it logs every
//! call and can simulate pointer input, applying the same hover filtering a
//! real surface would.

use std::cell::RefCell;
use std::collections::HashMap;

use tokio::sync::mpsc;

use graph_orbit_core::{Point, VisualGraph};

// ---------------------------------------------------------------------------
// Items and events
// ---------------------------------------------------------------------------

/// Something the pointer can land on, carrying the display id of the owning
/// node or edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphItem {
    Node(String),
    Edge(String),
    /// A rendered label; the id names the labeled node or edge.
    Label(String),
    /// An edge attachment point; the id names the owning node.
    Port(String),
}

impl GraphItem {
    /// The node id, when the item is a node.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            GraphItem::Node(id) => Some(id),
            _ => None,
        }
    }
}

/// Pointer input reported by the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    /// The hovered item changed; `None` means empty canvas.
    HoverChanged { item: Option<GraphItem> },
    DoubleClicked { item: GraphItem },
}

/// How the surface filters hover reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverConfig {
    /// Only nodes are hover targets.
    pub nodes_only: bool,
    /// Whether crossing a filtered-out item counts as leaving the current
    /// one. Off by default: sliding from a node onto its own label keeps the
    /// node hovered.
    pub discard_invalid_items: bool,
    pub enabled: bool,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            nodes_only: true,
            discard_invalid_items: false,
            enabled: true,
        }
    }
}

/// An owned pointer-event subscription. Dropping it unsubscribes; when the
/// surface shuts the stream down, `recv` returns `None`.
pub struct PointerEvents {
    rx: mpsc::UnboundedReceiver<PointerEvent>,
}

impl PointerEvents {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<PointerEvent>) -> Self {
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<PointerEvent> {
        self.rx.recv().await
    }

    /// Non-blocking receive, for pull-style consumers.
    pub fn try_recv(&mut self) -> Option<PointerEvent> {
        self.rx.try_recv().ok()
    }
}

// ---------------------------------------------------------------------------
// The surface trait
// ---------------------------------------------------------------------------

/// What the engine asks of a renderer. Calls arrive on the engine's thread;
/// implementations are free to queue them for their own paint loop.
pub trait RenderSurface {
    /// A freshly (re)built graph is ready to show.
    fn present(&self, graph: &VisualGraph);
    /// Node positions moved — one animation frame.
    fn positions_changed(&self, graph: &VisualGraph);
    fn add_highlight(&self, id: &str);
    fn clear_highlights(&self);
    fn configure_hover(&self, config: &HoverConfig);
    fn subscribe_pointer_events(&self) -> PointerEvents;
}

// ---------------------------------------------------------------------------
// Recording surface
// ---------------------------------------------------------------------------

/// One logged call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Present {
        node_ids: Vec<String>,
        edge_ids: Vec<String>,
    },
    PositionsChanged,
    AddHighlight(String),
    ClearHighlights,
    ConfigureHover(HoverConfig),
}

/// Surface double that records calls, tracks the live highlight set and the
/// last seen positions, and feeds simulated pointer input to subscribers.
#[derive(Default)]
pub struct RecordingSurface {
    calls: RefCell<Vec<SurfaceCall>>,
    highlights: RefCell<Vec<String>>,
    hover: RefCell<HoverConfig>,
    last_hover: RefCell<Option<GraphItem>>,
    last_positions: RefCell<HashMap<String, Point>>,
    senders: RefCell<Vec<mpsc::UnboundedSender<PointerEvent>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every live subscriber, dropping closed ones.
    pub fn emit(&self, event: PointerEvent) {
        self.senders
            .borrow_mut()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Simulate the pointer crossing onto `item` (`None` for empty canvas),
    /// applying the configured hover filtering before reporting.
    pub fn pointer_crossed(&self, item: Option<GraphItem>) {
        let config = self.hover.borrow().clone();
        if !config.enabled {
            return;
        }
        let reportable = match &item {
            None => true,
            Some(GraphItem::Node(_)) => true,
            Some(_) => !config.nodes_only,
        };
        let effective = if reportable {
            item
        } else if config.discard_invalid_items {
            None
        } else {
            // filtered out and not discarding: the previous hover stands
            return;
        };
        if *self.last_hover.borrow() == effective {
            return;
        }
        *self.last_hover.borrow_mut() = effective.clone();
        self.emit(PointerEvent::HoverChanged { item: effective });
    }

    /// Shut down every subscription; pump loops see the stream end.
    pub fn close_pointer_events(&self) {
        self.senders.borrow_mut().clear();
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    /// Ids currently highlighted, in the order they were added.
    pub fn highlighted(&self) -> Vec<String> {
        self.highlights.borrow().clone()
    }

    pub fn hover_config(&self) -> HoverConfig {
        self.hover.borrow().clone()
    }

    /// Positions captured by the most recent `positions_changed` call.
    pub fn last_positions(&self) -> HashMap<String, Point> {
        self.last_positions.borrow().clone()
    }

    /// Number of `positions_changed` calls, i.e. animation frames shown.
    pub fn frames_shown(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::PositionsChanged))
            .count()
    }

    pub fn presented(&self) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| matches!(c, SurfaceCall::Present { .. }))
    }
}

impl RenderSurface for RecordingSurface {
    fn present(&self, graph: &VisualGraph) {
        self.calls.borrow_mut().push(SurfaceCall::Present {
            node_ids: graph.node_ids().map(str::to_string).collect(),
            edge_ids: graph.edges().map(|e| e.id.clone()).collect(),
        });
    }

    fn positions_changed(&self, graph: &VisualGraph) {
        *self.last_positions.borrow_mut() = graph.positions();
        self.calls.borrow_mut().push(SurfaceCall::PositionsChanged);
    }

    fn add_highlight(&self, id: &str) {
        let mut highlights = self.highlights.borrow_mut();
        if !highlights.iter().any(|h| h == id) {
            highlights.push(id.to_string());
        }
        self.calls
            .borrow_mut()
            .push(SurfaceCall::AddHighlight(id.to_string()));
    }

    fn clear_highlights(&self) {
        self.highlights.borrow_mut().clear();
        self.calls.borrow_mut().push(SurfaceCall::ClearHighlights);
    }

    fn configure_hover(&self, config: &HoverConfig) {
        *self.hover.borrow_mut() = config.clone();
        self.calls
            .borrow_mut()
            .push(SurfaceCall::ConfigureHover(config.clone()));
    }

    fn subscribe_pointer_events(&self) -> PointerEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.borrow_mut().push(tx);
        PointerEvents::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Option<GraphItem> {
        Some(GraphItem::Node(id.to_string()))
    }

    fn label(id: &str) -> Option<GraphItem> {
        Some(GraphItem::Label(id.to_string()))
    }

    #[test]
    fn test_default_hover_reports_nodes_and_canvas_only() {
        let surface = RecordingSurface::new();
        let mut events = surface.subscribe_pointer_events();

        surface.pointer_crossed(node("1"));
        // a label crossing is filtered and keeps the node hovered
        surface.pointer_crossed(label("1"));
        surface.pointer_crossed(None);

        assert_eq!(
            events.try_recv(),
            Some(PointerEvent::HoverChanged { item: node("1") })
        );
        assert_eq!(
            events.try_recv(),
            Some(PointerEvent::HoverChanged { item: None })
        );
        assert_eq!(events.try_recv(), None);
    }

    #[test]
    fn test_discard_invalid_items_turns_filtered_crossings_into_exits() {
        let surface = RecordingSurface::new();
        surface.configure_hover(&HoverConfig {
            discard_invalid_items: true,
            ..HoverConfig::default()
        });
        let mut events = surface.subscribe_pointer_events();

        surface.pointer_crossed(node("1"));
        surface.pointer_crossed(label("1"));

        assert_eq!(
            events.try_recv(),
            Some(PointerEvent::HoverChanged { item: node("1") })
        );
        assert_eq!(
            events.try_recv(),
            Some(PointerEvent::HoverChanged { item: None })
        );
    }

    #[test]
    fn test_all_items_reported_when_nodes_only_is_off() {
        let surface = RecordingSurface::new();
        surface.configure_hover(&HoverConfig {
            nodes_only: false,
            ..HoverConfig::default()
        });
        let mut events = surface.subscribe_pointer_events();

        surface.pointer_crossed(Some(GraphItem::Edge("10".to_string())));
        assert_eq!(
            events.try_recv(),
            Some(PointerEvent::HoverChanged {
                item: Some(GraphItem::Edge("10".to_string()))
            })
        );
    }

    #[test]
    fn test_disabled_hover_reports_nothing() {
        let surface = RecordingSurface::new();
        surface.configure_hover(&HoverConfig {
            enabled: false,
            ..HoverConfig::default()
        });
        let mut events = surface.subscribe_pointer_events();

        surface.pointer_crossed(node("1"));
        surface.pointer_crossed(None);
        assert_eq!(events.try_recv(), None);
    }

    #[test]
    fn test_repeated_crossings_do_not_repeat_events() {
        let surface = RecordingSurface::new();
        let mut events = surface.subscribe_pointer_events();

        surface.pointer_crossed(node("1"));
        surface.pointer_crossed(node("1"));
        assert!(events.try_recv().is_some());
        assert_eq!(events.try_recv(), None);
    }

    #[test]
    fn test_highlights_dedupe_but_calls_log_everything() {
        let surface = RecordingSurface::new();
        surface.add_highlight("1");
        surface.add_highlight("1");
        surface.add_highlight("2");
        assert_eq!(surface.highlighted(), ["1", "2"]);
        assert_eq!(
            surface
                .calls()
                .iter()
                .filter(|c| matches!(c, SurfaceCall::AddHighlight(_)))
                .count(),
            3
        );

        surface.clear_highlights();
        assert!(surface.highlighted().is_empty());
    }

    #[test]
    fn test_closed_stream_ends_subscriptions() {
        let surface = RecordingSurface::new();
        let mut events = surface.subscribe_pointer_events();
        surface.close_pointer_events();
        surface.emit(PointerEvent::HoverChanged { item: None });
        assert_eq!(events.try_recv(), None);
    }
}
