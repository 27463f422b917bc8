// src/errors.rs

//! Crate-wide error types and aliases.
//!
//! [`GraphError`] is what the graph itself reports. Every variant carries the
//! ids involved so callers can decide to retry with other inputs, skip, or
//! abort. [`DepgraphError`] is the wider error used by config loading and the
//! CLI.

use thiserror::Error;

/// Errors produced by [`crate::dag::DependencyGraph`] operations.
///
/// None of these leave the graph in a partially mutated state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node id that already has a bound payload was registered again.
    #[error("duplicate node: '{node_id}' already has a payload")]
    DuplicateNode { node_id: String },

    /// An operation referenced a node id that is not in the graph.
    #[error("node not found: '{node_id}'")]
    NodeNotFound { node_id: String },

    /// Adding the edge `from -> to` would close a cycle.
    ///
    /// `path` starts and ends at `from`; consecutive pairs are edges that
    /// would exist had the edge been accepted.
    #[error("adding edge '{from}' -> '{to}' would create a cycle: {}", .path.join(" -> "))]
    CycleDetected {
        from: String,
        to: String,
        path: Vec<String>,
    },

    /// Structural problems found by a whole-graph check.
    ///
    /// Always lists every problem found, not just the first.
    #[error("graph validation failed: {}", .problems.join("; "))]
    GraphValidation { problems: Vec<String> },
}

impl GraphError {
    pub fn duplicate_node(node_id: impl Into<String>) -> Self {
        Self::DuplicateNode {
            node_id: node_id.into(),
        }
    }

    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    pub fn validation(problems: Vec<String>) -> Self {
        Self::GraphValidation { problems }
    }

    /// The node id this error is about, for the variants that name one.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            GraphError::DuplicateNode { node_id } | GraphError::NodeNotFound { node_id } => {
                Some(node_id)
            }
            GraphError::CycleDetected { from, .. } => Some(from),
            GraphError::GraphValidation { .. } => None,
        }
    }
}

/// Result alias for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum DepgraphError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DepgraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_message_shows_path() {
        let err = GraphError::CycleDetected {
            from: "a".into(),
            to: "b".into(),
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'a' -> 'b'"));
        assert!(msg.contains("a -> b -> a"));
        assert_eq!(err.node_id(), Some("a"));
    }

    #[test]
    fn validation_error_lists_every_problem() {
        let err = GraphError::validation(vec!["first".into(), "second".into()]);
        let msg = err.to_string();
        assert!(msg.contains("first"));
        assert!(msg.contains("second"));
        assert_eq!(err.node_id(), None);
    }

    #[test]
    fn graph_error_converts_into_crate_error() {
        let err: DepgraphError = GraphError::node_not_found("missing").into();
        match err {
            DepgraphError::Graph(GraphError::NodeNotFound { node_id }) => {
                assert_eq!(node_id, "missing")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
