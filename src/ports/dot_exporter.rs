//! Block graph DOT Exporter
//!
//! Serializes a GraphDescription as Graphviz DOT text.

use crate::domain::render_graph::{GraphDescription, RenderNode};

pub const GRAPH_COMMENT: &str = "Block Nodes Graph";

pub struct DotExporter;

impl DotExporter {
    /// Convert a GraphDescription to a DOT string.
    pub fn to_dot(graph: &GraphDescription) -> String {
        let mut lines = Vec::new();

        lines.push(format!("// {}", GRAPH_COMMENT));
        lines.push("digraph {".to_string());

        // Legend text is left-justified, like edge labels
        lines.push(Self::node_line(&graph.legend, Self::left_justified(&graph.legend.label)));
        for node in &graph.nodes {
            lines.push(Self::node_line(node, Self::centered(&node.label)));
        }

        for edge in &graph.edges {
            lines.push(format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                Self::escape(&edge.parent_id),
                Self::escape(&edge.child_id),
                Self::left_justified(&edge.label)
            ));
        }

        lines.push("}".to_string());
        lines.push(String::new());

        lines.join("\n")
    }

    fn node_line(node: &RenderNode, label: String) -> String {
        format!(
            "    \"{}\" [label=\"{}\", shape={}];",
            Self::escape(&node.id),
            label,
            node.shape.as_str()
        )
    }

    fn centered(label: &str) -> String {
        label
            .lines()
            .map(Self::escape)
            .collect::<Vec<_>>()
            .join("\\n")
    }

    // Every line, the last one included, ends with `\l`.
    fn left_justified(label: &str) -> String {
        label.lines().map(|l| format!("{}\\l", Self::escape(l))).collect()
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
