/// QMP socket transport.
///
/// Line-delimited JSON over a unix socket: read the greeting, negotiate
/// capabilities, then one `{"execute": ...}` request per command.

use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use log::debug;
use serde_json::{json, Value};

use super::parse_reply;
use crate::error::{BlockGraphError, Result};
use crate::ports::MonitorTransport;

pub struct QmpSocket {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
}

impl QmpSocket {
    /// Connect and complete the capabilities handshake.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let stream = UnixStream::connect(path.as_ref())?;
        let reader = BufReader::new(stream.try_clone()?);
        let mut qmp = QmpSocket {
            reader,
            writer: stream,
        };

        let greeting = qmp.read_message("greeting")?;
        match greeting.get("QMP") {
            Some(info) => debug!("QMP greeting: {}", info),
            None => {
                return Err(BlockGraphError::MalformedReply {
                    command: "greeting".to_string(),
                    detail: format!("expected a QMP greeting, got {}", greeting),
                })
            }
        }

        qmp.command("qmp_capabilities")?;
        Ok(qmp)
    }

    fn read_message(&mut self, command: &str) -> Result<Value> {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "monitor closed the connection",
                )
                .into());
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return serde_json::from_str(trimmed).map_err(|e| BlockGraphError::MalformedReply {
                command: command.to_string(),
                detail: e.to_string(),
            });
        }
    }

    // Asynchronous events may arrive between a request and its reply.
    fn read_reply(&mut self, command: &str) -> Result<Value> {
        loop {
            let message = self.read_message(command)?;
            if let Some(event) = message.get("event") {
                debug!("Skipping QMP event {}", event);
                continue;
            }
            return Ok(message);
        }
    }
}

impl MonitorTransport for QmpSocket {
    fn command(&mut self, command: &str) -> Result<Value> {
        let request = json!({ "execute": command }).to_string();
        debug!("QMP -> {}", request);

        self.writer.write_all(request.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        let reply = self.read_reply(command)?;
        parse_reply(command, reply)
    }
}
