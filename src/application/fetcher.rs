//! Topology Fetcher
//!
//! Resolves the three snapshots, from captured JSON when supplied and from
//! the monitor otherwise.

use log::info;
use serde::de::DeserializeOwned;

use crate::domain::topology::{
    index_jobs, index_named_nodes, JobNode, JobNodes, NamedNodes, RawGraph, StorageNode,
};
use crate::error::{BlockGraphError, Result};
use crate::ports::MonitorTransport;

pub const QUERY_NAMED_NODES: &str = "query-named-block-nodes";
pub const QUERY_JOBS: &str = "query-block-jobs";
pub const QUERY_GRAPH: &str = "x-debug-query-block-graph";

/// Captured query results; any that are `None` are fetched live.
#[derive(Debug, Clone, Default)]
pub struct SuppliedSnapshots {
    pub named_nodes: Option<Vec<StorageNode>>,
    pub jobs: Option<Vec<JobNode>>,
    pub graph: Option<RawGraph>,
}

impl SuppliedSnapshots {
    /// Parse the three captured replies (their `return` payloads).
    pub fn from_json(named_nodes: &str, jobs: &str, graph: &str) -> Result<Self> {
        Ok(SuppliedSnapshots {
            named_nodes: Some(parse_input(QUERY_NAMED_NODES, named_nodes)?),
            jobs: Some(parse_input(QUERY_JOBS, jobs)?),
            graph: Some(parse_input(QUERY_GRAPH, graph)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    pub named_nodes: NamedNodes,
    pub jobs: JobNodes,
    pub graph: RawGraph,
}

/// Resolve all three snapshots in order. The first failing query aborts.
pub fn fetch_topology(
    mut transport: Option<&mut dyn MonitorTransport>,
    supplied: SuppliedSnapshots,
) -> Result<TopologySnapshot> {
    let named_nodes = match supplied.named_nodes {
        Some(nodes) => nodes,
        None => query(&mut transport, QUERY_NAMED_NODES)?,
    };
    let jobs = match supplied.jobs {
        Some(jobs) => jobs,
        None => query(&mut transport, QUERY_JOBS)?,
    };
    let graph = match supplied.graph {
        Some(graph) => graph,
        None => query(&mut transport, QUERY_GRAPH)?,
    };

    Ok(TopologySnapshot {
        named_nodes: index_named_nodes(named_nodes),
        jobs: index_jobs(jobs),
        graph,
    })
}

fn query<T: DeserializeOwned>(
    transport: &mut Option<&mut dyn MonitorTransport>,
    command: &'static str,
) -> Result<T> {
    let transport = transport
        .as_deref_mut()
        .ok_or(BlockGraphError::MissingSource(command))?;

    info!("Querying {}", command);
    let payload = transport.command(command)?;
    serde_json::from_value(payload).map_err(|e| BlockGraphError::MalformedReply {
        command: command.to_string(),
        detail: e.to_string(),
    })
}

fn parse_input<T: DeserializeOwned>(what: &'static str, json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|source| BlockGraphError::MalformedInput { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Replays canned payloads and records the commands it was sent.
    struct ScriptedMonitor {
        replies: HashMap<&'static str, Value>,
        sent: Vec<String>,
    }

    impl ScriptedMonitor {
        fn new() -> Self {
            let mut replies = HashMap::new();
            replies.insert(
                QUERY_NAMED_NODES,
                json!([{"node-name": "disk0", "drv": "file", "file": "/img/disk0.raw"}]),
            );
            replies.insert(QUERY_JOBS, json!([{"device": "job0", "type": "backup"}]));
            replies.insert(
                QUERY_GRAPH,
                json!({
                    "nodes": [{"id": 1, "type": "block-driver", "name": "disk0"}],
                    "edges": []
                }),
            );
            ScriptedMonitor {
                replies,
                sent: Vec::new(),
            }
        }
    }

    impl MonitorTransport for ScriptedMonitor {
        fn command(&mut self, command: &str) -> Result<Value> {
            self.sent.push(command.to_string());
            match self.replies.get(command) {
                Some(reply) => Ok(reply.clone()),
                None => Err(BlockGraphError::Protocol {
                    command: command.to_string(),
                    payload: json!({"error": {"class": "CommandNotFound"}}),
                }),
            }
        }
    }

    #[test]
    fn test_live_queries_run_in_order() {
        let mut monitor = ScriptedMonitor::new();
        let snapshot = fetch_topology(Some(&mut monitor), SuppliedSnapshots::default()).unwrap();

        assert_eq!(monitor.sent, vec![QUERY_NAMED_NODES, QUERY_JOBS, QUERY_GRAPH]);
        assert_eq!(snapshot.named_nodes["disk0"].driver, "file");
        assert_eq!(snapshot.jobs["job0"].job_kind, "backup");
        assert_eq!(snapshot.graph.nodes.len(), 1);
    }

    #[test]
    fn test_supplied_snapshots_skip_queries() {
        let mut monitor = ScriptedMonitor::new();
        let supplied = SuppliedSnapshots {
            jobs: Some(vec![]),
            ..Default::default()
        };

        let snapshot = fetch_topology(Some(&mut monitor), supplied).unwrap();
        assert_eq!(monitor.sent, vec![QUERY_NAMED_NODES, QUERY_GRAPH]);
        assert!(snapshot.jobs.is_empty());
    }

    #[test]
    fn test_offline_needs_no_transport() {
        let supplied = SuppliedSnapshots::from_json(
            r#"[{"node-name": "n", "drv": "raw"}]"#,
            "[]",
            r#"{"nodes": [], "edges": []}"#,
        )
        .unwrap();

        let snapshot = fetch_topology(None, supplied).unwrap();
        assert_eq!(snapshot.named_nodes.len(), 1);
    }

    #[test]
    fn test_missing_snapshot_without_transport() {
        let err = fetch_topology(None, SuppliedSnapshots::default()).unwrap_err();
        assert!(matches!(err, BlockGraphError::MissingSource(QUERY_NAMED_NODES)));
    }

    #[test]
    fn test_protocol_error_aborts() {
        let mut monitor = ScriptedMonitor::new();
        monitor.replies.remove(QUERY_JOBS);

        let err = fetch_topology(Some(&mut monitor), SuppliedSnapshots::default()).unwrap_err();
        assert!(matches!(err, BlockGraphError::Protocol { .. }));
        assert_eq!(monitor.sent, vec![QUERY_NAMED_NODES, QUERY_JOBS]);
    }

    #[test]
    fn test_malformed_input() {
        let err = SuppliedSnapshots::from_json("[]", "not json", "{}").unwrap_err();
        match err {
            BlockGraphError::MalformedInput { what, .. } => assert_eq!(what, QUERY_JOBS),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = SuppliedSnapshots::from_json("[{\"drv\": \"raw\"}]", "[]", "{}").unwrap_err();
        assert!(matches!(err, BlockGraphError::MalformedInput { what: QUERY_NAMED_NODES, .. }));
    }
}
