// src/dag/snapshot.rs

//! Structural (de)serialization of a graph.
//!
//! A snapshot keeps the config, the node ids with a small descriptor of each
//! payload, and the flat edge list. Payloads themselves are never written:
//! a graph rebuilt from a snapshot has placeholder nodes that the caller
//! hydrates with [`DependencyGraph::add_node`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dag::graph::DependencyGraph;
use crate::dag::payload::NodePayload;
use crate::errors::{GraphError, GraphResult};
use crate::types::{GraphConfig, NodeId};

/// What a snapshot records about a node's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub payload_type_tag: Option<String>,
    pub payload_id: Option<String>,
}

impl NodeDescriptor {
    /// Descriptor for a node with no payload bound.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn describe<P: NodePayload + ?Sized>(payload: &P) -> Self {
        Self {
            payload_type_tag: payload.type_tag(),
            payload_id: payload.payload_id(),
        }
    }
}

/// Structural snapshot of a [`DependencyGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub config: GraphConfig,
    pub nodes: BTreeMap<NodeId, NodeDescriptor>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

impl<T> DependencyGraph<T> {
    /// Snapshot using the payload's own [`NodePayload`] description.
    pub fn to_structured(&self) -> GraphSnapshot
    where
        T: NodePayload,
    {
        self.to_structured_with(NodeDescriptor::describe::<T>)
    }

    /// Snapshot with a caller-supplied description of each payload.
    ///
    /// Placeholders are always described as [`NodeDescriptor::placeholder`].
    pub fn to_structured_with<F>(&self, mut describe: F) -> GraphSnapshot
    where
        F: FnMut(&T) -> NodeDescriptor,
    {
        let nodes = self
            .nodes
            .iter()
            .map(|(id, slot)| {
                let descriptor = match slot {
                    Some(payload) => describe(payload),
                    None => NodeDescriptor::placeholder(),
                };
                (id.clone(), descriptor)
            })
            .collect();

        GraphSnapshot {
            config: self.config.clone(),
            nodes,
            edges: self.edges(),
        }
    }

    /// Rebuild the structure of a graph from a snapshot.
    ///
    /// Every node is created as a placeholder. Edges that name unknown nodes
    /// are all reported together in one [`GraphError::GraphValidation`];
    /// edges that would close a cycle are reported the same way.
    pub fn from_structured(snapshot: &GraphSnapshot) -> GraphResult<Self> {
        let mut graph = Self::with_config(snapshot.config.clone());
        for id in snapshot.nodes.keys() {
            graph.add_placeholder(id);
        }

        let mut problems = Vec::new();
        for (source, target) in &snapshot.edges {
            for endpoint in [source, target] {
                if !snapshot.nodes.contains_key(endpoint) {
                    problems.push(format!(
                        "edge '{source}' -> '{target}' references unknown node '{endpoint}'"
                    ));
                }
            }
        }
        if !problems.is_empty() {
            return Err(GraphError::validation(problems));
        }

        for (source, target) in &snapshot.edges {
            match graph.add_edge(source, target) {
                Ok(()) => {}
                Err(err @ GraphError::CycleDetected { .. }) => problems.push(err.to_string()),
                Err(other) => return Err(other),
            }
        }
        if !problems.is_empty() {
            return Err(GraphError::validation(problems));
        }

        debug!(
            graph = %graph.config.name,
            nodes = graph.len(),
            edges = graph.edge_count(),
            "rebuilt graph from snapshot"
        );
        Ok(graph)
    }
}
