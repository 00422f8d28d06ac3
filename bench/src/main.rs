use std::time::Instant;

use serde_json::json;

use graph_orbit_core::{
    compute_radial, reachable, ArrowKind, CategoryRule, CenterPolicy, EdgePredicate, EdgeRecord,
    EdgeStyle, GraphBuilder, GraphTemplate, LabelBinding, NodePredicate, NodeRecord, NodeShape,
    NodeStyle, NodeTemplate, PropertyMap, RadialParams, Size,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let benchmark = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: i64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(50_000);

    if benchmark == "help" || benchmark == "--help" {
        println!("Usage: graph-orbit-bench [benchmark] [node_count]");
        println!();
        println!("Benchmarks:");
        println!("  all     Every phase on every generator (default)");
        println!("  build   Record sets into a styled visual graph");
        println!("  reach   Directed reachability from the head/hub node");
        println!("  layout  Radial solve with automatic center selection");
        println!();
        println!("Generators: chain (deep rings), star (one wide ring),");
        println!("clusters (bridged communities), random (uniform edges).");
        println!("Default node_count: 50000");
        return;
    }
    if !matches!(benchmark, "all" | "build" | "reach" | "layout") {
        eprintln!("Unknown benchmark: {}. Use --help for options.", benchmark);
        return;
    }

    println!("graph-orbit-bench");
    println!("=================");
    println!();

    let generators: Vec<(&str, fn(i64) -> RecordSet)> = vec![
        ("Chain (deep rings)", gen_chain as fn(i64) -> RecordSet),
        ("Star (one wide ring)", gen_star),
        ("Clusters (bridged communities)", gen_clusters),
        ("Random (uniform edges)", gen_random),
    ];

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count, benchmark);
    }
}

type RecordSet = (Vec<NodeRecord>, Vec<EdgeRecord>);

fn run_benchmark(name: &str, generator: fn(i64) -> RecordSet, node_count: i64, benchmark: &str) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let (nodes, edges) = generator(node_count);
    println!(
        "Generated {} node / {} edge records in {:.2}s",
        nodes.len(),
        edges.len(),
        t.elapsed().as_secs_f64()
    );

    // build always runs — the other phases need the graph
    let builder = GraphBuilder::new(bench_template());
    let t = Instant::now();
    let (graph, report) = builder.build(&nodes, &edges);
    let build_elapsed = t.elapsed();
    if matches!(benchmark, "all" | "build") {
        println!(
            "build:  {:>8.1}ms — {} nodes, {} edges ({} skipped, {} duplicate)",
            build_elapsed.as_secs_f64() * 1000.0,
            graph.node_count(),
            graph.edge_count(),
            report.edges_skipped,
            report.edges_duplicate
        );
    }

    if matches!(benchmark, "all" | "reach") {
        let t = Instant::now();
        let reached = reachable(&graph, "0", true);
        println!(
            "reach:  {:>8.1}ms — {} nodes reachable from node 0",
            t.elapsed().as_secs_f64() * 1000.0,
            reached.len()
        );
    }

    if matches!(benchmark, "all" | "layout") {
        let t = Instant::now();
        let positions = compute_radial(&graph, &CenterPolicy::Automatic, &RadialParams::default())
            .expect("automatic center selection cannot fail on a non-empty graph");
        let elapsed = t.elapsed();
        let outermost = positions
            .values()
            .map(|p| (p.x * p.x + p.y * p.y).sqrt())
            .fold(0.0f32, f32::max);
        println!(
            "layout: {:>8.1}ms — {} positions, outermost ring at {:.0}",
            elapsed.as_secs_f64() * 1000.0,
            positions.len(),
            outermost
        );
    }
    println!();
}

/// The movie-demo template: movies yellow and boxy, actor edges thick and
/// blue, so the build phase exercises classification and overrides.
fn bench_template() -> GraphTemplate {
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

// ---------------------------------------------------------------------------
// Generators — all O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}

const REL_TYPES: [&str; 5] = ["ACTED_IN", "DIRECTED", "PRODUCED", "REVIEWED", "KNOWS"];

/// Every fifth record is a movie so classification has both branches to take.
fn node_record(identity: i64) -> NodeRecord {
    let mut properties = PropertyMap::new();
    if identity % 5 == 0 {
        properties.insert("title".to_string(), json!(format!("Movie {}", identity)));
        NodeRecord {
            identity,
            labels: vec!["Movie".to_string()],
            properties,
        }
    } else {
        properties.insert("name".to_string(), json!(format!("Person {}", identity)));
        NodeRecord {
            identity,
            labels: vec!["Person".to_string()],
            properties,
        }
    }
}

fn edge_record(identity: i64, start: i64, end: i64, rng: &mut FastRng) -> EdgeRecord {
    EdgeRecord {
        identity,
        start,
        end,
        rel_type: REL_TYPES[rng.next(5) as usize].to_string(),
        properties: PropertyMap::new(),
    }
}

/// One long path: every layout ring holds a single node, reachability walks
/// the whole thing. Worst case for ring count.
fn gen_chain(node_count: i64) -> RecordSet {
    let mut rng = FastRng::new(42);
    let nodes: Vec<NodeRecord> = (0..node_count).map(node_record).collect();
    let edges: Vec<EdgeRecord> = (0..node_count - 1)
        .map(|i| edge_record(node_count + i, i, i + 1, &mut rng))
        .collect();
    (nodes, edges)
}

/// One hub with every other node on the first ring. Worst case for span
/// subdivision of a single parent.
fn gen_star(node_count: i64) -> RecordSet {
    let mut rng = FastRng::new(12345);
    let nodes: Vec<NodeRecord> = (0..node_count).map(node_record).collect();
    let edges: Vec<EdgeRecord> = (1..node_count)
        .map(|i| edge_record(node_count + i, 0, i, &mut rng))
        .collect();
    (nodes, edges)
}

/// Dense communities of ~1000 nodes, each head bridged to the previous one,
/// so node 0 can reach every community.
fn gen_clusters(node_count: i64) -> RecordSet {
    let cluster_size = 1000i64.min(node_count.max(1));
    let intra_edges = 4i64;
    let mut rng = FastRng::new(67890);
    let nodes: Vec<NodeRecord> = (0..node_count).map(node_record).collect();

    let mut edges = Vec::with_capacity((node_count * (intra_edges + 1)) as usize);
    let mut edge_id = node_count;
    let mut cluster_start = 0;
    while cluster_start < node_count {
        let cluster_end = (cluster_start + cluster_size).min(node_count);
        let span = cluster_end - cluster_start;
        if cluster_start > 0 {
            // bridge from the previous community's head
            edges.push(edge_record(
                edge_id,
                cluster_start - cluster_size,
                cluster_start,
                &mut rng,
            ));
            edge_id += 1;
        }
        for i in cluster_start..cluster_end {
            for _ in 0..intra_edges {
                let target = cluster_start + rng.next(span as u64) as i64;
                if target != i {
                    edges.push(edge_record(edge_id, i, target, &mut rng));
                    edge_id += 1;
                }
            }
        }
        cluster_start = cluster_end;
    }
    (nodes, edges)
}

/// Uniform random edges, ~3 per node. Baseline topology with no structure.
fn gen_random(node_count: i64) -> RecordSet {
    let target_edges = node_count * 3;
    let mut rng = FastRng::new(54321);
    let nodes: Vec<NodeRecord> = (0..node_count).map(node_record).collect();

    let mut edges = Vec::with_capacity(target_edges as usize);
    for k in 0..target_edges {
        let from = rng.next(node_count as u64) as i64;
        let to = rng.next(node_count as u64) as i64;
        if from != to {
            edges.push(edge_record(node_count + k, from, to, &mut rng));
        }
    }
    (nodes, edges)
}
