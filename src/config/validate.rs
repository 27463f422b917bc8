// src/config/validate.rs

use std::collections::BTreeMap;

use crate::config::model::{NodeConfig, NodeSpec, RawWorkflowFile, WorkflowFile};
use crate::dag::DependencyGraph;
use crate::errors::{DepgraphError, GraphResult, Result};
use crate::types::GraphConfig;

impl TryFrom<RawWorkflowFile> for WorkflowFile {
    type Error = DepgraphError;

    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_workflow(&raw)?;
        Ok(WorkflowFile::new_unchecked(raw.graph, raw.node))
    }
}

impl WorkflowFile {
    /// Build the dependency graph described by this file.
    ///
    /// Each node's payload is a [`NodeSpec`]; an `after = ["x"]` entry on
    /// node `y` becomes the edge `x -> y`.
    pub fn build_graph(&self) -> GraphResult<DependencyGraph<NodeSpec>> {
        build_graph_from(&self.graph, &self.node)
    }
}

/// Run every semantic check on a raw workflow file.
pub fn validate_workflow(raw: &RawWorkflowFile) -> Result<()> {
    validate_raw_workflow(raw)
}

fn validate_raw_workflow(raw: &RawWorkflowFile) -> Result<()> {
    ensure_has_nodes(raw)?;
    validate_graph_section(raw)?;
    validate_node_dependencies(raw)?;
    validate_dag(raw)?;
    Ok(())
}

fn ensure_has_nodes(raw: &RawWorkflowFile) -> Result<()> {
    if raw.node.is_empty() {
        return Err(DepgraphError::ConfigError(
            "workflow must contain at least one [node.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_graph_section(raw: &RawWorkflowFile) -> Result<()> {
    if raw.graph.name.trim().is_empty() {
        return Err(DepgraphError::ConfigError(
            "[graph].name must not be empty".to_string(),
        ));
    }

    if let Some(timeout) = raw.graph.timeout {
        if !timeout.is_finite() || timeout <= 0.0 {
            return Err(DepgraphError::ConfigError(format!(
                "[graph].timeout must be a positive number of seconds (got {timeout})"
            )));
        }
    }

    Ok(())
}

fn validate_node_dependencies(raw: &RawWorkflowFile) -> Result<()> {
    for (name, node) in raw.node.iter() {
        for dep in node.after.iter() {
            if dep == name {
                return Err(DepgraphError::ConfigError(format!(
                    "node '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !raw.node.contains_key(dep) {
                return Err(DepgraphError::ConfigError(format!(
                    "node '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(raw: &RawWorkflowFile) -> Result<()> {
    // Building the graph runs the same cycle guard every caller gets, so the
    // error carries the offending path.
    build_graph_from(&raw.graph, &raw.node)?;
    Ok(())
}

fn build_graph_from(
    graph: &GraphConfig,
    nodes: &BTreeMap<String, NodeConfig>,
) -> GraphResult<DependencyGraph<NodeSpec>> {
    let mut dag = DependencyGraph::with_config(graph.clone());

    for (name, node) in nodes.iter() {
        dag.add_node(name.clone(), NodeSpec::from_config(name.clone(), node))?;
    }

    // Edge direction: dep -> node. For `[node.B] after = ["A"]` we add A -> B.
    for (name, node) in nodes.iter() {
        for dep in node.after.iter() {
            dag.add_edge(dep, name)?;
        }
    }

    Ok(dag)
}
