//! graph-orbit-viewer: Orchestration for interactive graph exploration.
//!
//! Drives graph-orbit-core between two external collaborators: a graph
//! database reached through [`GraphSource`] and a diagram renderer behind
//! [`RenderSurface`]. The [`Explorer`] runs the load flow, the
//! [`LayoutOrchestrator`] animates radial layouts with cancel-then-restart
//! semantics, and the [`InteractionController`] turns pointer events into
//! highlights and refocus morphs.
//!
//! Everything is single-threaded cooperative async: state is shared with
//! `Rc<RefCell<..>>`, futures are `!Send`, and callers pump the engine on a
//! tokio `LocalSet` over a current-thread runtime.

mod animate;
mod config;
mod explore;
mod interaction;
mod memory;
mod source;
mod status;
mod surface;

pub use animate::{LayoutOrchestrator, LayoutOutcome, LayoutRequest};
pub use config::{ConfigError, ExplorerConfig};
pub use explore::{ExploreError, Explorer};
pub use interaction::{FocusPhase, HoverPhase, InteractionConfig, InteractionController};
pub use memory::MemorySource;
pub use source::{
    edge_query, node_query, run_query, GraphSource, Params, QueryRow, QuerySession, QueryValue,
    SourceError, EDGE_FIELD, NODE_FIELD, NODE_IDS_PARAM,
};
pub use status::{ExplorerStatus, LoadStats};
pub use surface::{
    GraphItem, HoverConfig, PointerEvent, PointerEvents, RecordingSurface, RenderSurface,
    SurfaceCall,
};
