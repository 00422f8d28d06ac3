use std::rc::Rc;

use crate::model::{Point, VisualEdge, VisualGraph, VisualNode};
use crate::record::{EdgeRecord, NodeRecord};
use crate::style::{EdgeStyle, NodeTemplate};

/// Predicate over a node record, used to classify nodes into categories.
pub enum NodePredicate {
    /// Matches when the record carries the label.
    HasLabel(String),
    /// Matches every record.
    Any,
    Custom(Box<dyn Fn(&NodeRecord) -> bool>),
}

impl NodePredicate {
    pub fn matches(&self, record: &NodeRecord) -> bool {
        match self {
            NodePredicate::HasLabel(label) => record.has_label(label),
            NodePredicate::Any => true,
            NodePredicate::Custom(f) => f(record),
        }
    }
}

/// Predicate over an edge record, used by style overrides.
pub enum EdgePredicate {
    /// Matches edges of the relationship type.
    RelType(String),
    Any,
    Custom(Box<dyn Fn(&EdgeRecord) -> bool>),
}

impl EdgePredicate {
    pub fn matches(&self, record: &EdgeRecord) -> bool {
        match self {
            EdgePredicate::RelType(t) => record.rel_type == *t,
            EdgePredicate::Any => true,
            EdgePredicate::Custom(f) => f(record),
        }
    }
}

/// Display-label rule for nodes. One binding is resolved once and shared by
/// reference across any number of categories.
pub enum LabelBinding {
    /// First listed property with a text value wins.
    Properties(Vec<String>),
    Custom(Box<dyn Fn(&NodeRecord) -> Option<String>>),
}

impl LabelBinding {
    /// Shared binding over an ordered property-key list.
    pub fn properties(keys: &[&str]) -> Rc<Self> {
        Rc::new(LabelBinding::Properties(
            keys.iter().map(|k| k.to_string()).collect(),
        ))
    }

    pub fn resolve(&self, record: &NodeRecord) -> Option<String> {
        match self {
            LabelBinding::Properties(keys) => {
                keys.iter().find_map(|k| record.property_text(k))
            }
            LabelBinding::Custom(f) => f(record),
        }
    }
}

/// Display-label rule for edges.
pub enum EdgeLabel {
    /// The relationship type, verbatim.
    RelType,
    None,
    Custom(Box<dyn Fn(&EdgeRecord) -> Option<String>>),
}

impl EdgeLabel {
    pub fn resolve(&self, record: &EdgeRecord) -> Option<String> {
        match self {
            EdgeLabel::RelType => Some(record.rel_type.clone()),
            EdgeLabel::None => None,
            EdgeLabel::Custom(f) => f(record),
        }
    }
}

/// A node category: predicate, appearance, label binding.
pub struct CategoryRule {
    pub name: String,
    pub matches: NodePredicate,
    pub template: NodeTemplate,
    pub label: Rc<LabelBinding>,
}

impl CategoryRule {
    pub fn new(
        name: &str,
        matches: NodePredicate,
        template: NodeTemplate,
        label: Rc<LabelBinding>,
    ) -> Self {
        Self {
            name: name.to_string(),
            matches,
            template,
            label,
        }
    }
}

/// An edge style override; the first matching override wins.
pub struct EdgeStyleRule {
    pub matches: EdgePredicate,
    pub style: EdgeStyle,
}

/// Everything the builder needs to know about appearance: ordered category
/// rules (first match wins, fallback otherwise), the default edge style and
/// its overrides, and the edge label rule.
pub struct GraphTemplate {
    pub categories: Vec<CategoryRule>,
    pub fallback: CategoryRule,
    pub edge_style: EdgeStyle,
    pub edge_overrides: Vec<EdgeStyleRule>,
    pub edge_label: EdgeLabel,
}

impl GraphTemplate {
    /// Template with no categories: every node takes the default appearance
    /// under the given label binding, edges get the default style labeled by
    /// relationship type.
    pub fn new(label: Rc<LabelBinding>) -> Self {
        Self {
            categories: Vec::new(),
            fallback: CategoryRule::new(
                "default",
                NodePredicate::Any,
                NodeTemplate::default(),
                label,
            ),
            edge_style: EdgeStyle::default(),
            edge_overrides: Vec::new(),
            edge_label: EdgeLabel::RelType,
        }
    }

    pub fn with_category(mut self, rule: CategoryRule) -> Self {
        self.categories.push(rule);
        self
    }

    pub fn with_edge_style(mut self, style: EdgeStyle) -> Self {
        self.edge_style = style;
        self
    }

    pub fn with_edge_override(mut self, matches: EdgePredicate, style: EdgeStyle) -> Self {
        self.edge_overrides.push(EdgeStyleRule { matches, style });
        self
    }

    /// The category a record falls into: first matching rule, else fallback.
    pub fn classify(&self, record: &NodeRecord) -> &CategoryRule {
        self.categories
            .iter()
            .find(|c| c.matches.matches(record))
            .unwrap_or(&self.fallback)
    }

    /// Style for an edge record: first matching override, else the default.
    pub fn edge_style_for(&self, record: &EdgeRecord) -> &EdgeStyle {
        self.edge_overrides
            .iter()
            .find(|o| o.matches.matches(record))
            .map(|o| &o.style)
            .unwrap_or(&self.edge_style)
    }
}

/// Counters from one build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub nodes_created: usize,
    pub nodes_updated: usize,
    pub edges_created: usize,
    /// Edges dropped because an endpoint was not among the node records.
    pub edges_skipped: usize,
    pub edges_duplicate: usize,
}

/// Converts record sets into a styled `VisualGraph`.
///
/// Building is total: any input, including empty sets, yields a graph. An
/// edge whose endpoint is missing is skipped with a warning rather than
/// failing the build; the strict variant lives on `VisualGraph::insert_edge`.
pub struct GraphBuilder {
    template: GraphTemplate,
}

impl GraphBuilder {
    pub fn new(template: GraphTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &GraphTemplate {
        &self.template
    }

    pub fn build(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> (VisualGraph, BuildReport) {
        let mut graph = VisualGraph::new();
        let mut report = BuildReport::default();

        for record in nodes {
            let rule = self.template.classify(record);
            let node = VisualNode {
                id: record.display_id(),
                labels: record.labels.clone(),
                label: rule.label.resolve(record),
                category: rule.name.clone(),
                template: rule.template.clone(),
                position: Point::ORIGIN,
                tag: record.clone(),
            };
            if graph.insert_node(node) {
                report.nodes_created += 1;
            } else {
                report.nodes_updated += 1;
            }
        }

        for record in edges {
            let edge = VisualEdge {
                id: record.display_id(),
                source: record.start_id(),
                target: record.end_id(),
                label: self.template.edge_label.resolve(record),
                style: self.template.edge_style_for(record).clone(),
                tag: record.clone(),
            };
            match graph.insert_edge(edge) {
                Ok(true) => report.edges_created += 1,
                Ok(false) => report.edges_duplicate += 1,
                Err(e) => {
                    tracing::warn!("skipping edge {}: {}", record.display_id(), e);
                    report.edges_skipped += 1;
                }
            }
        }

        (graph, report)
    }
}
