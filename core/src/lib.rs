//! graph-orbit-core: Visual graph model and algorithms for interactive
//! exploration of a property graph.
//!
//! Turns query-result records into a deduplicated, styled visual graph,
//! answers directed reachability for hover highlighting, and solves radial
//! layouts around a chosen focus node. Pure and synchronous — no I/O, no
//! async, no rendering; the orchestration layer lives in graph-orbit-viewer
//! and this crate compiles standalone.

mod build;
mod layout;
mod model;
mod reach;
mod record;
mod style;

pub use build::{
    BuildReport, CategoryRule, EdgeLabel, EdgePredicate, EdgeStyleRule, GraphBuilder,
    GraphTemplate, LabelBinding, NodePredicate,
};
pub use layout::{compute_radial, CenterPolicy, LayoutError, RadialParams};
pub use model::{ModelError, Point, VisualEdge, VisualGraph, VisualNode};
pub use reach::reachable;
pub use record::{display_id, format_value, EdgeRecord, NodeRecord, PropertyMap};
pub use style::{ArrowKind, EdgeStyle, NodeShape, NodeStyle, NodeTemplate, Size};
