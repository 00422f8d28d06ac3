//! Headless end-to-end run over a small movie dataset: load, hover
//! reachability, tooltip, double-click refocus — with a recording surface
//! standing in for the renderer.
//!
//! Run with: cargo run -p graph-orbit-viewer --example movies

use std::time::Duration;

use graph_orbit_core::{
    ArrowKind, CategoryRule, EdgePredicate, EdgeRecord, EdgeStyle, GraphTemplate, LabelBinding,
    NodePredicate, NodeRecord, NodeShape, NodeStyle, NodeTemplate, PropertyMap, Size,
};
use graph_orbit_viewer::{
    Explorer, ExplorerConfig, GraphItem, MemorySource, PointerEvent, RecordingSurface,
};
use serde_json::json;

fn node(identity: i64, label: &str, key: &str, value: &str) -> NodeRecord {
    let mut properties = PropertyMap::new();
    properties.insert(key.to_string(), json!(value));
    NodeRecord {
        identity,
        labels: vec![label.to_string()],
        properties,
    }
}

fn edge(identity: i64, start: i64, end: i64, rel_type: &str) -> EdgeRecord {
    EdgeRecord {
        identity,
        start,
        end,
        rel_type: rel_type.to_string(),
        properties: PropertyMap::new(),
    }
}

/// Movies yellow and boxy, everything else on the default template, actor
/// edges thick and blue.
fn movie_template() -> GraphTemplate {
    let label = LabelBinding::properties(&["title", "name"]);
    GraphTemplate::new(label.clone())
        .with_category(CategoryRule::new(
            "movie",
            NodePredicate::HasLabel("Movie".to_string()),
            NodeTemplate::new(
                NodeStyle::new(NodeShape::RoundRectangle, "yellow"),
                Size::new(120.0, 50.0),
            ),
            label,
        ))
        .with_edge_override(
            EdgePredicate::RelType("ACTED_IN".to_string()),
            EdgeStyle {
                stroke: "mediumblue".to_string(),
                width: 3.0,
                smoothing: 30.0,
                target_arrow: ArrowKind::Triangle,
            },
        )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(async {
        let source = MemorySource::new(
            vec![
                node(1, "Movie", "title", "The Matrix"),
                node(2, "Person", "name", "Keanu Reeves"),
                node(3, "Person", "name", "Carrie-Anne Moss"),
                node(4, "Movie", "title", "John Wick"),
                node(5, "Person", "name", "Lana Wachowski"),
            ],
            vec![
                edge(10, 2, 1, "ACTED_IN"),
                edge(11, 3, 1, "ACTED_IN"),
                edge(12, 2, 4, "ACTED_IN"),
                edge(13, 5, 1, "DIRECTED"),
                edge(14, 2, 3, "KNOWS"),
            ],
        );
        let config = ExplorerConfig {
            morph_duration: Duration::from_millis(200),
            frame_interval: Duration::from_millis(20),
            ..ExplorerConfig::default()
        };
        let explorer = Explorer::new(source, RecordingSurface::new(), movie_template(), config)?;

        let stats = explorer.load().await?;
        println!(
            "loaded {} nodes / {} edges in {:.1}ms",
            stats.nodes,
            stats.edges,
            stats.elapsed.as_secs_f64() * 1000.0
        );

        let controller = explorer.controller();
        controller.attach();

        // hover Keanu: everything reachable along edge direction lights up
        controller.handle_event(PointerEvent::HoverChanged {
            item: Some(GraphItem::Node("2".to_string())),
        });
        println!(
            "hover node 2 highlights: {:?}",
            explorer.surface().highlighted()
        );
        if let Some(tooltip) = controller.tooltip_for(&GraphItem::Node("2".to_string())) {
            println!("tooltip for node 2: {tooltip}");
        }
        controller.handle_event(PointerEvent::HoverChanged { item: None });

        // double-click The Matrix: morph the radial layout onto it
        controller.handle_event(PointerEvent::DoubleClicked {
            item: GraphItem::Node("1".to_string()),
        });
        tokio::time::sleep(Duration::from_millis(300)).await;
        let position = explorer.graph().borrow().position("1");
        println!("node 1 after refocus: {position:?}");

        println!("{}", explorer.status());
        controller.detach();
        Ok::<_, anyhow::Error>(())
    }))?;
    Ok(())
}
