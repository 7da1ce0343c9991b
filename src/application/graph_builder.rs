//! Graph Builder
//!
//! Joins the three topology snapshots into a labeled render graph.

use std::path::Path;

use log::{debug, warn};

use crate::domain::permission;
use crate::domain::render_graph::{GraphDescription, RenderEdge, RenderNode, Shape};
use crate::domain::topology::{GraphEdge, GraphNode, JobNodes, NamedNodes, NodeKind, RawGraph};
use crate::error::{BlockGraphError, Result};

pub const LEGEND_ID: &str = "legend";

pub const LEGEND: &str = "permission symbols:
  w - Write
  r - consistent-Read
  u - write - Unchanged
  s - reSize
edge label scheme:
  <child type>
  <perm>
  <shared_perm>";

/// Label of a block backend that has no name.
pub const UNNAMED_BACKEND: &str = "unnamed blk";

/// Build the render graph. Nodes and edges keep the raw graph's order and
/// the first node without a matching snapshot entry aborts the build.
pub fn build_graph(named: &NamedNodes, jobs: &JobNodes, graph: &RawGraph) -> Result<GraphDescription> {
    let legend = RenderNode {
        id: LEGEND_ID.to_string(),
        label: LEGEND.to_string(),
        shape: Shape::None,
    };

    let nodes = graph
        .nodes
        .iter()
        .map(|node| render_node(node, named, jobs))
        .collect::<Result<Vec<_>>>()?;

    let edges: Vec<RenderEdge> = graph.edges.iter().map(render_edge).collect();

    debug!(
        "Built block graph: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );

    Ok(GraphDescription { legend, nodes, edges })
}

fn render_node(node: &GraphNode, named: &NamedNodes, jobs: &JobNodes) -> Result<RenderNode> {
    let name = node.name();
    let (label, shape) = match node.kind {
        NodeKind::Driver => {
            let info = named.get(name).ok_or_else(|| BlockGraphError::InconsistentTopology {
                kind: node.kind,
                name: name.to_string(),
                source_query: "query-named-block-nodes",
            })?;
            let mut label = format!("{} [{}]", name, info.driver);
            if info.is_file_backed() {
                match info.file() {
                    Some(file) => {
                        label.push('\n');
                        label.push_str(&base_name(file));
                    }
                    None => warn!("file node '{}' reports no image path", name),
                }
            }
            (label, Shape::Ellipse)
        }
        NodeKind::Job => {
            let info = jobs.get(name).ok_or_else(|| BlockGraphError::InconsistentTopology {
                kind: node.kind,
                name: name.to_string(),
                source_query: "query-block-jobs",
            })?;
            (format!("{} job ({})", info.job_kind, name), Shape::Box)
        }
        NodeKind::Frontend => {
            let label = if name.is_empty() { UNNAMED_BACKEND } else { name };
            (label.to_string(), Shape::Box)
        }
    };

    Ok(RenderNode {
        id: node.id.clone(),
        label,
        shape,
    })
}

fn render_edge(edge: &GraphEdge) -> RenderEdge {
    RenderEdge {
        parent_id: edge.parent_id.clone(),
        child_id: edge.child_id.clone(),
        label: format!(
            "{}\n{}\n{}",
            edge.name,
            permission::encode(&edge.perm),
            permission::encode(&edge.shared_perm)
        ),
    }
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
