// src/config/loader.rs

use std::path::Path;

use tracing::debug;

use crate::config::model::{NodeSpec, RawWorkflowFile, WorkflowFile};
use crate::dag::{DependencyGraph, GraphSnapshot};
use crate::errors::{DepgraphError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Load a workflow file from a given path and return the raw `RawWorkflowFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (unknown dependencies, cycles, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    load_from_path_with(&RealFileSystem, path)
}

pub fn load_from_path_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    let raw: RawWorkflowFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a workflow file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one node,
///   - unknown or self `after` references,
///   - dependency cycles,
///   - a sane `[graph]` section.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkflowFile> {
    load_and_validate_with(&RealFileSystem, path)
}

pub fn load_and_validate_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<WorkflowFile> {
    let raw = load_from_path_with(fs, &path)?;
    WorkflowFile::try_from(raw)
}

/// Read a JSON snapshot written by `depgraph export`.
pub fn load_snapshot_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<GraphSnapshot> {
    let contents = fs.read_to_string(path.as_ref())?;
    Ok(GraphSnapshot::from_json(&contents)?)
}

/// Load a graph from either a TOML workflow file or a JSON snapshot,
/// decided by the file extension.
///
/// Snapshot nodes are hydrated with a [`NodeSpec`] whose `kind` is the
/// snapshot's payload type tag, since the original payloads are not stored.
pub fn load_graph_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<DependencyGraph<NodeSpec>> {
    let path = path.as_ref();

    if !fs.exists(path) {
        return Err(DepgraphError::ConfigError(format!(
            "no workflow file found at {} (pass --config or create {DEFAULT_CONFIG_FILE})",
            path.display()
        )));
    }

    if is_snapshot_path(path) {
        debug!(path = %path.display(), "loading graph from snapshot");
        let snapshot = load_snapshot_with(fs, path)?;
        let mut graph = DependencyGraph::from_structured(&snapshot)?;
        for (id, descriptor) in snapshot.nodes.iter() {
            let spec = NodeSpec {
                name: descriptor.payload_id.clone().unwrap_or_else(|| id.clone()),
                kind: descriptor.payload_type_tag.clone(),
                description: None,
            };
            graph.add_node(id.clone(), spec)?;
        }
        return Ok(graph);
    }

    debug!(path = %path.display(), "loading graph from workflow file");
    let workflow = load_and_validate_with(fs, path)?;
    Ok(workflow.build_graph()?)
}

pub fn load_graph(path: impl AsRef<Path>) -> Result<DependencyGraph<NodeSpec>> {
    load_graph_with(&RealFileSystem, path)
}

fn is_snapshot_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Workflow file used when `--config` is not given, relative to the working
/// directory.
pub const DEFAULT_CONFIG_FILE: &str = "Depgraph.toml";
