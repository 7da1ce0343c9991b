use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::render_graph::GraphDescription;
use crate::error::Result;

pub mod dot_exporter;

/// Sends one argument-free monitor command and returns its `return` payload.
pub trait MonitorTransport {
    fn command(&mut self, command: &str) -> Result<Value>;
}

/// Turns a graph description into files on disk; returns the paths written.
pub trait GraphRenderer {
    fn render(&self, graph: &GraphDescription, path: &Path) -> Result<Vec<PathBuf>>;
}
