/// libvirt proxy transport.
///
/// Runs `virsh qemu-monitor-command <domain> <request>` once per command.
/// Only argument-free commands are supported.

use std::process::Command;

use log::debug;
use serde_json::{json, Value};

use super::parse_reply;
use crate::error::{BlockGraphError, Result};
use crate::ports::MonitorTransport;

pub struct VirshProxy {
    domain: String,
    virsh_binary: String,
}

impl VirshProxy {
    pub fn new(domain: impl Into<String>, virsh_binary: impl Into<String>) -> Self {
        VirshProxy {
            domain: domain.into(),
            virsh_binary: virsh_binary.into(),
        }
    }

    /// Arguments passed to virsh for `command`.
    pub fn command_args(&self, command: &str) -> Vec<String> {
        vec![
            "qemu-monitor-command".to_string(),
            self.domain.clone(),
            json!({ "execute": command }).to_string(),
        ]
    }
}

impl MonitorTransport for VirshProxy {
    fn command(&mut self, command: &str) -> Result<Value> {
        let args = self.command_args(command);
        debug!("{} {}", self.virsh_binary, args.join(" "));

        let output = Command::new(&self.virsh_binary).args(&args).output()?;

        if !output.status.success() {
            return Err(BlockGraphError::Protocol {
                command: command.to_string(),
                payload: json!({
                    "exit-status": output.status.code(),
                    "stderr": String::from_utf8_lossy(&output.stderr).trim(),
                }),
            });
        }

        let reply: Value =
            serde_json::from_slice(&output.stdout).map_err(|e| BlockGraphError::MalformedReply {
                command: command.to_string(),
                detail: e.to_string(),
            })?;
        parse_reply(command, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args() {
        let proxy = VirshProxy::new("guest1", "virsh");
        let args = proxy.command_args("query-block-jobs");
        assert_eq!(args[0], "qemu-monitor-command");
        assert_eq!(args[1], "guest1");
        let request: Value = serde_json::from_str(&args[2]).unwrap();
        assert_eq!(request, json!({"execute": "query-block-jobs"}));
    }

    #[test]
    fn test_missing_binary_is_transport_error() {
        let mut proxy = VirshProxy::new("guest1", "/nonexistent/blockgraph-virsh");
        let err = proxy.command("query-block-jobs").unwrap_err();
        assert!(matches!(err, BlockGraphError::Transport(_)));
    }
}
