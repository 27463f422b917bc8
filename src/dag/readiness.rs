// src/dag/readiness.rs

//! Queries an external scheduler polls while working through a graph.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use crate::dag::graph::DependencyGraph;
use crate::types::NodeId;

impl<T> DependencyGraph<T> {
    /// Nodes that may start now, given the set of completed nodes.
    ///
    /// A node is ready when it is not itself completed and every one of its
    /// predecessors is. Nodes without predecessors are always ready until
    /// completed. Ids in `completed` that the graph does not know are ignored.
    pub fn get_ready_nodes<S>(&self, completed: &HashSet<S>) -> Vec<NodeId>
    where
        S: Borrow<str> + Hash + Eq,
    {
        self.nodes
            .keys()
            .filter(|id| !completed.contains(id.as_str()))
            .filter(|id| {
                self.reverse
                    .get(*id)
                    .is_none_or(|preds| preds.iter().all(|p| completed.contains(p.as_str())))
            })
            .cloned()
            .collect()
    }

    /// Entry points: nodes with no predecessors.
    pub fn get_root_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .filter(|id| self.reverse.get(*id).is_none_or(|preds| preds.is_empty()))
            .cloned()
            .collect()
    }

    /// Terminal points: nodes with no successors.
    pub fn get_leaf_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .filter(|id| self.adjacency.get(*id).is_none_or(|succs| succs.is_empty()))
            .cloned()
            .collect()
    }
}
