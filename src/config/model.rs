// src/config/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dag::payload::NodePayload;
use crate::types::GraphConfig;

/// Workflow file exactly as read from TOML, before validation.
///
/// ```toml
/// [graph]
/// name = "lead-pipeline"
/// max_retries = 5
/// timeout = 30.0
/// fail_fast = true
///
/// [node.fetch]
/// kind = "http"
/// description = "pull new leads"
///
/// [node.score]
/// kind = "scorer"
/// after = ["fetch"]
/// ```
///
/// Every section is optional; validation insists on at least one node.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWorkflowFile {
    /// `[graph]`: metadata passed through to whoever executes the graph.
    #[serde(default)]
    pub graph: GraphConfig,

    /// `[node.<id>]` sections, keyed by node id.
    #[serde(default)]
    pub node: BTreeMap<String, NodeConfig>,
}

/// A validated workflow file.
///
/// Only obtainable through `TryFrom<RawWorkflowFile>` (see
/// `config::validate`), so every `after` reference names a real node and
/// the dependency relation is acyclic.
#[derive(Debug, Clone)]
pub struct WorkflowFile {
    pub graph: GraphConfig,
    pub node: BTreeMap<String, NodeConfig>,
}

impl WorkflowFile {
    pub(crate) fn new_unchecked(graph: GraphConfig, node: BTreeMap<String, NodeConfig>) -> Self {
        Self { graph, node }
    }
}

/// `[node.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Free-form kind of work (e.g. `"scorer"`); becomes the snapshot's
    /// payload type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Nodes that must complete before this one starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,
}

/// Payload used for graphs built from workflow files or snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: String,
    pub kind: Option<String>,
    pub description: Option<String>,
}

impl NodeSpec {
    pub fn from_config(name: impl Into<String>, cfg: &NodeConfig) -> Self {
        Self {
            name: name.into(),
            kind: cfg.kind.clone(),
            description: cfg.description.clone(),
        }
    }
}

impl NodePayload for NodeSpec {
    fn type_tag(&self) -> Option<String> {
        self.kind.clone()
    }

    fn payload_id(&self) -> Option<String> {
        Some(self.name.clone())
    }
}
