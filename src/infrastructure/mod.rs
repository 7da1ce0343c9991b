// Transport and renderer implementations for blockgraph.

use std::path::Path;

use log::info;
use serde_json::Value;

use crate::error::{BlockGraphError, Result};
use crate::ports::MonitorTransport;

pub mod graphviz;
pub mod qmp_socket;
pub mod virsh;

pub use graphviz::GraphvizRenderer;
pub use qmp_socket::QmpSocket;
pub use virsh::VirshProxy;

/// Unwrap a monitor reply: `error` becomes a protocol error carrying the
/// whole reply, otherwise the `return` member is handed back.
pub fn parse_reply(command: &str, mut reply: Value) -> Result<Value> {
    if reply.get("error").is_some() {
        return Err(BlockGraphError::Protocol {
            command: command.to_string(),
            payload: reply,
        });
    }

    match reply.get_mut("return") {
        Some(payload) => Ok(payload.take()),
        None => Err(BlockGraphError::MalformedReply {
            command: command.to_string(),
            detail: format!("neither 'return' nor 'error' in {}", reply),
        }),
    }
}

/// Pick the transport for `endpoint`: an existing filesystem path is taken
/// as a QMP socket, anything else as a libvirt domain name.
pub fn connect(endpoint: &str, virsh_binary: &str) -> Result<Box<dyn MonitorTransport>> {
    if Path::new(endpoint).exists() {
        info!("Connecting to QMP socket {}", endpoint);
        Ok(Box::new(QmpSocket::connect(endpoint)?))
    } else {
        info!("Using libvirt domain '{}' through {}", endpoint, virsh_binary);
        Ok(Box::new(VirshProxy::new(endpoint, virsh_binary)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reply_return() {
        let value = parse_reply("query-block-jobs", json!({"return": [], "id": "x"})).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_parse_reply_error_keeps_payload() {
        let reply = json!({"error": {"class": "CommandNotFound", "desc": "nope"}});
        match parse_reply("x-debug-query-block-graph", reply.clone()) {
            Err(BlockGraphError::Protocol { command, payload }) => {
                assert_eq!(command, "x-debug-query-block-graph");
                assert_eq!(payload, reply);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_without_members() {
        let err = parse_reply("query-block-jobs", json!({"timestamp": 1})).unwrap_err();
        assert!(matches!(err, BlockGraphError::MalformedReply { .. }));
    }
}
