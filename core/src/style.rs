/// Node extent in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Outline shape a surface draws for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Ellipse,
    RoundRectangle,
    Rectangle,
    Pill,
}

/// Node appearance. Fills are CSS color strings; interpreting them is the
/// rendering surface's business.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub shape: NodeShape,
    pub fill: String,
}

impl NodeStyle {
    pub fn new(shape: NodeShape, fill: &str) -> Self {
        Self {
            shape,
            fill: fill.to_string(),
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        NodeStyle::new(NodeShape::Ellipse, "lightblue")
    }
}

/// Arrow drawn at the target end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    None,
    Default,
    Triangle,
}

/// Edge appearance. `smoothing` is the corner-rounding radius for bent
/// paths; zero draws straight segments.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub stroke: String,
    pub width: f32,
    pub smoothing: f32,
    pub target_arrow: ArrowKind,
}

impl EdgeStyle {
    pub fn new(stroke: &str, width: f32) -> Self {
        Self {
            stroke: stroke.to_string(),
            width,
            smoothing: 0.0,
            target_arrow: ArrowKind::Default,
        }
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        EdgeStyle::new("gray", 1.0)
    }
}

/// Per-category appearance: style plus preferred node size.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub style: NodeStyle,
    pub size: Size,
}

impl NodeTemplate {
    pub fn new(style: NodeStyle, size: Size) -> Self {
        Self { style, size }
    }
}

impl Default for NodeTemplate {
    fn default() -> Self {
        NodeTemplate::new(NodeStyle::default(), Size::new(120.0, 40.0))
    }
}
