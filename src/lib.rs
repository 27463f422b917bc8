// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod export;
pub mod fs;
pub mod logging;
pub mod types;

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::NodeSpec;
use crate::config::loader::load_graph_with;
use crate::dag::DependencyGraph;
use crate::errors::{DepgraphError, GraphError};
use crate::export::ExportFormat;
use crate::fs::{FileSystem, RealFileSystem};

/// How a command finished, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The graph was loaded (or rejected) but has structural problems.
    Problems,
}

/// High-level entry point used by `main.rs`: load the graph named by
/// `--config` and run the subcommand against it, writing to stdout.
pub fn run(args: CliArgs) -> Result<Outcome> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(&RealFileSystem, &args, &mut out)
}

/// Same as [`run`], with the filesystem and output injected.
pub fn run_with(fs: &dyn FileSystem, args: &CliArgs, out: &mut dyn Write) -> Result<Outcome> {
    let path = Path::new(&args.config);

    match &args.command {
        Command::Validate => return validate(fs, path, out),
        Command::Order => {
            for id in load(fs, path)?.topological_sort()? {
                writeln!(out, "{id}")?;
            }
        }
        Command::Ready(ready) => {
            let graph = load(fs, path)?;
            let completed: HashSet<&str> = ready.completed.iter().map(String::as_str).collect();
            for id in graph.get_ready_nodes(&completed) {
                writeln!(out, "{id}")?;
            }
        }
        Command::Waves => {
            for wave in load(fs, path)?.execution_waves()? {
                writeln!(out, "{}", wave.join(" "))?;
            }
        }
        Command::Export(opts) => {
            let graph = load(fs, path)?;
            match &opts.out {
                Some(target) => {
                    let rendered = export::render(&graph, opts.format)?;
                    fs.write(Path::new(target), format!("{rendered}\n").as_bytes())
                        .with_context(|| format!("exporting graph to {target}"))?;
                    info!(path = %target, format = %opts.format, "graph exported");
                }
                None => export::write_to(&graph, opts.format, out)?,
            }
        }
        Command::Dot => export::write_to(&load(fs, path)?, ExportFormat::Dot, out)?,
    }

    Ok(Outcome::Success)
}

fn load(fs: &dyn FileSystem, path: &Path) -> Result<DependencyGraph<NodeSpec>> {
    let graph = load_graph_with(fs, path)?;
    info!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        name = %graph.config().name,
        "loaded graph"
    );
    Ok(graph)
}

/// `validate`: print one problem per line, `ok` if there are none.
///
/// A workflow whose dependencies form a cycle cannot be built at all, so a
/// graph error from loading is reported as a problem rather than a failure.
fn validate(fs: &dyn FileSystem, path: &Path, out: &mut dyn Write) -> Result<Outcome> {
    let graph: DependencyGraph<NodeSpec> = match load_graph_with(fs, path) {
        Ok(graph) => graph,
        Err(DepgraphError::Graph(
            err @ (GraphError::CycleDetected { .. } | GraphError::GraphValidation { .. }),
        )) => {
            writeln!(out, "{err}")?;
            return Ok(Outcome::Problems);
        }
        Err(other) => return Err(other.into()),
    };

    let problems = graph.validate();
    debug!(count = problems.len(), "validation finished");

    if problems.is_empty() {
        writeln!(out, "ok")?;
        return Ok(Outcome::Success);
    }

    for problem in problems.iter() {
        writeln!(out, "{problem}")?;
    }

    if graph.detect_cycle() {
        Ok(Outcome::Problems)
    } else {
        Ok(Outcome::Success)
    }
}
