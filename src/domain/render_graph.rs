//! Render graph
//!
//! Backend-neutral node/edge description handed to a renderer.

/// Node outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Ellipse,
    Box,
    /// Bare text, used by the legend.
    None,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Ellipse => "ellipse",
            Shape::Box => "box",
            Shape::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    pub id: String,
    /// Display text; lines are separated by `\n`.
    pub label: String,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEdge {
    pub parent_id: String,
    pub child_id: String,
    /// Edge name, perm code and shared-perm code, one per line.
    pub label: String,
}

impl RenderEdge {
    pub fn label_lines(&self) -> Vec<&str> {
        self.label.lines().collect()
    }
}

/// A complete graph ready for rendering. The legend always comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDescription {
    pub legend: RenderNode,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl GraphDescription {
    /// Legend followed by the topology nodes, in emission order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &RenderNode> {
        std::iter::once(&self.legend).chain(self.nodes.iter())
    }
}
