//! Topology records
//!
//! Wire shapes of the three monitor queries the renderer consumes:
//! `query-named-block-nodes`, `query-block-jobs` and
//! `x-debug-query-block-graph`.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Named storage nodes keyed by node name.
pub type NamedNodes = HashMap<String, StorageNode>;

/// Active block jobs keyed by device.
pub type JobNodes = HashMap<String, JobNode>;

/// A block driver instance as reported by `query-named-block-nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageNode {
    #[serde(rename = "node-name")]
    pub name: String,
    /// Driver name, e.g. `qcow2`, `file`, `nbd`.
    #[serde(rename = "drv")]
    pub driver: String,
    /// Driver-specific members (`file`, `ro`, `image`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StorageNode {
    /// Whether this node is the protocol-level `file` driver.
    pub fn is_file_backed(&self) -> bool {
        self.driver == "file"
    }

    /// Image path held in the `file` member, if any.
    pub fn file(&self) -> Option<&str> {
        self.extra.get("file").and_then(Value::as_str)
    }
}

/// A running block job as reported by `query-block-jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobNode {
    pub device: String,
    /// Job type, e.g. `mirror`, `backup`, `commit`, `stream`.
    #[serde(rename = "type")]
    pub job_kind: String,
}

/// Node kinds of the raw block graph. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "block-driver")]
    Driver,
    #[serde(rename = "block-job")]
    Job,
    #[serde(rename = "block-backend")]
    Frontend,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Driver => "block-driver",
            NodeKind::Job => "block-job",
            NodeKind::Frontend => "block-backend",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(deserialize_with = "node_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Absent or empty only for anonymous block backends.
    #[serde(default)]
    pub name: Option<String>,
}

impl GraphNode {
    /// The node name, with a missing name read as empty.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(rename = "parent", deserialize_with = "node_id")]
    pub parent_id: String,
    #[serde(rename = "child", deserialize_with = "node_id")]
    pub child_id: String,
    /// Child role, e.g. `file`, `backing`, `root`.
    pub name: String,
    /// Permissions the parent holds on the child.
    pub perm: Vec<String>,
    /// Permissions the parent lets other parents take.
    #[serde(rename = "shared-perm")]
    pub shared_perm: Vec<String>,
}

/// Result of `x-debug-query-block-graph`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Index a `query-named-block-nodes` reply by node name.
pub fn index_named_nodes(nodes: Vec<StorageNode>) -> NamedNodes {
    nodes.into_iter().map(|n| (n.name.clone(), n)).collect()
}

/// Index a `query-block-jobs` reply by device.
pub fn index_jobs(jobs: Vec<JobNode>) -> JobNodes {
    jobs.into_iter().map(|j| (j.device.clone(), j)).collect()
}

// QEMU reports ids as integers; captured snapshots may carry strings.
fn node_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "node id must be a number or string, found {}",
            other
        ))),
    }
}
