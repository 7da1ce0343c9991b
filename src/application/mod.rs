use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ports::{GraphRenderer, MonitorTransport};

pub mod fetcher;
pub mod graph_builder;

pub use fetcher::{fetch_topology, SuppliedSnapshots, TopologySnapshot};
pub use graph_builder::build_graph;

pub struct RenderUsecase<'a> {
    pub renderer: &'a dyn GraphRenderer,
}

impl<'a> RenderUsecase<'a> {
    /// Fetch, build and render; returns the files written.
    pub fn run(
        &self,
        transport: Option<&mut dyn MonitorTransport>,
        supplied: SuppliedSnapshots,
        output: &Path,
    ) -> Result<Vec<PathBuf>> {
        let snapshot = fetch_topology(transport, supplied)?;
        let graph = build_graph(&snapshot.named_nodes, &snapshot.jobs, &snapshot.graph)?;
        self.renderer.render(&graph, output)
    }
}
