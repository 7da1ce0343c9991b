// Error taxonomy shared by the transports, the fetcher and the graph builder.

use serde_json::Value;
use thiserror::Error;

use crate::domain::topology::NodeKind;

pub type Result<T> = std::result::Result<T, BlockGraphError>;

#[derive(Debug, Error)]
pub enum BlockGraphError {
    /// The monitor answered with an `error` member. The whole reply is kept.
    #[error("QMP command '{command}' failed: {payload}")]
    Protocol { command: String, payload: Value },

    /// A raw graph node has no counterpart in the named-node or job snapshot.
    #[error("{kind} node '{name}' is missing from the {source_query} snapshot")]
    InconsistentTopology {
        kind: NodeKind,
        name: String,
        source_query: &'static str,
    },

    /// A pre-supplied snapshot does not parse or lacks required fields.
    #[error("malformed {what}: {source}")]
    MalformedInput {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The monitor reply parsed as JSON but has neither `return` nor `error`,
    /// or its payload does not have the expected shape.
    #[error("malformed reply to '{command}': {detail}")]
    MalformedReply { command: String, detail: String },

    #[error("no snapshot supplied for '{0}' and no monitor connection available")]
    MissingSource(&'static str),

    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),

    #[error("render failed: {0}")]
    Render(String),
}
