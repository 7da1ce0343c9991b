// Command-line entry point for blockgraph.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use blockgraph::application::{RenderUsecase, SuppliedSnapshots};
use blockgraph::infrastructure::{self, graphviz::DEFAULT_FORMAT, GraphvizRenderer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Either `<endpoint> <output>` where endpoint is a QMP socket path or a
    /// libvirt domain name, or `<named-nodes-json> <jobs-json> <graph-json> <output>`
    #[arg(required = true, num_args = 2..=4, value_name = "ARGS")]
    args: Vec<String>,

    /// Image format passed to Graphviz
    #[arg(short, long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// Only write the DOT file
    #[arg(long)]
    dot_only: bool,

    /// Graphviz executable
    #[arg(long, default_value = "dot")]
    dot_binary: String,

    /// virsh executable used for libvirt domains
    #[arg(long, default_value = "virsh")]
    virsh_binary: String,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

enum Source {
    Live(String),
    Offline(SuppliedSnapshots),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .parse_default_env()
        .init();

    // Offline JSON is validated before anything touches the monitor
    let (source, output) = match cli.args.as_slice() {
        [endpoint, output] => (Source::Live(endpoint.clone()), PathBuf::from(output)),
        [named, jobs, graph, output] => (
            Source::Offline(
                SuppliedSnapshots::from_json(named, jobs, graph)
                    .context("Invalid snapshot arguments")?,
            ),
            PathBuf::from(output),
        ),
        other => bail!("expected 2 or 4 arguments, got {}", other.len()),
    };

    let renderer = GraphvizRenderer {
        dot_binary: cli.dot_binary.clone(),
        format: if cli.dot_only { None } else { Some(cli.format.clone()) },
    };
    let usecase = RenderUsecase { renderer: &renderer };

    let written = match source {
        Source::Live(endpoint) => {
            let mut transport = infrastructure::connect(&endpoint, &cli.virsh_binary)
                .with_context(|| format!("Failed to reach monitor at {}", endpoint))?;
            usecase.run(Some(&mut *transport), SuppliedSnapshots::default(), &output)
        }
        Source::Offline(supplied) => usecase.run(None, supplied, &output),
    }
    .context("Failed to render block graph")?;

    for path in written {
        info!("Output: {}", path.display());
    }
    Ok(())
}
