/// Graphviz renderer.
///
/// Writes DOT text to the output path, then runs `dot -T<format>` to
/// produce `<output>.<format>` next to it.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::domain::render_graph::GraphDescription;
use crate::error::{BlockGraphError, Result};
use crate::ports::dot_exporter::DotExporter;
use crate::ports::GraphRenderer;

pub const DEFAULT_FORMAT: &str = "png";

pub struct GraphvizRenderer {
    pub dot_binary: String,
    /// Image format; `None` writes the DOT text only.
    pub format: Option<String>,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self {
            dot_binary: "dot".to_string(),
            format: Some(DEFAULT_FORMAT.to_string()),
        }
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, graph: &GraphDescription, path: &Path) -> Result<Vec<PathBuf>> {
        fs::write(path, DotExporter::to_dot(graph))?;
        info!("Wrote {}", path.display());
        let mut written = vec![path.to_path_buf()];

        if let Some(format) = &self.format {
            let image = image_path(path, format);
            let output = Command::new(&self.dot_binary)
                .args(dot_args(format, path, &image))
                .output()
                .map_err(|e| BlockGraphError::Render(format!("cannot run {}: {}", self.dot_binary, e)))?;

            if !output.status.success() {
                return Err(BlockGraphError::Render(format!(
                    "{} exited with {:?}: {}",
                    self.dot_binary,
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }

            info!("Wrote {}", image.display());
            written.push(image);
        }

        Ok(written)
    }
}

/// `<path>.<format>`; the format is appended, never substituted.
pub fn image_path(path: &Path, format: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(format);
    PathBuf::from(name)
}

fn dot_args(format: &str, source: &Path, image: &Path) -> Vec<OsString> {
    vec![
        format!("-T{}", format).into(),
        "-o".into(),
        image.as_os_str().to_owned(),
        source.as_os_str().to_owned(),
    ]
}
