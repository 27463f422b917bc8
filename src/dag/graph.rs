// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use tracing::{debug, warn};

use crate::errors::{GraphError, GraphResult};
use crate::types::{GraphConfig, NodeId};

pub(super) static NO_NEIGHBOURS: BTreeSet<NodeId> = BTreeSet::new();

/// In-memory dependency graph keyed by node id.
///
/// An edge `source -> target` means "source must complete before target may
/// start". Edges live in two synchronized views: `adjacency` (source to its
/// targets) and `reverse` (target to its sources), so both successor and
/// predecessor queries are a single map lookup.
///
/// Each node owns a payload slot. A slot is `None` for placeholder nodes
/// created by [`DependencyGraph::from_structured`]; calling
/// [`DependencyGraph::add_node`] on a placeholder attaches the payload.
///
/// Invariants after every public mutation:
/// - every edge endpoint is a node in the graph
/// - the edge relation is acyclic
/// - `t ∈ adjacency[s]` iff `s ∈ reverse[t]`
/// - there are no duplicate edges
///
/// The graph does no locking of its own; see [`super::SharedGraph`].
#[derive(Debug, Clone)]
pub struct DependencyGraph<T> {
    pub(super) config: GraphConfig,
    pub(super) nodes: BTreeMap<NodeId, Option<T>>,
    pub(super) adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    pub(super) reverse: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl<T> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::with_config(GraphConfig::default())
    }
}

impl<T> DependencyGraph<T> {
    /// Empty graph with the default [`GraphConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            reverse: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register a node, or hydrate an existing placeholder.
    ///
    /// Fails with [`GraphError::DuplicateNode`] only when `id` already has a
    /// payload bound.
    pub fn add_node(&mut self, id: impl Into<NodeId>, payload: T) -> GraphResult<()> {
        let id = id.into();

        match self.nodes.get_mut(&id) {
            Some(slot) if slot.is_some() => Err(GraphError::duplicate_node(id)),
            Some(slot) => {
                debug!(node = %id, "attaching payload to placeholder node");
                *slot = Some(payload);
                Ok(())
            }
            None => {
                debug!(node = %id, "adding node");
                self.adjacency.insert(id.clone(), BTreeSet::new());
                self.reverse.insert(id.clone(), BTreeSet::new());
                self.nodes.insert(id, Some(payload));
                Ok(())
            }
        }
    }

    /// Register `id` with no payload bound. Existing nodes are left alone.
    pub(super) fn add_placeholder(&mut self, id: &str) {
        if self.nodes.contains_key(id) {
            return;
        }
        self.adjacency.insert(id.to_string(), BTreeSet::new());
        self.reverse.insert(id.to_string(), BTreeSet::new());
        self.nodes.insert(id.to_string(), None);
    }

    /// Remove a node and every edge touching it.
    ///
    /// Returns the node's payload slot (`None` for a placeholder).
    pub fn remove_node(&mut self, id: &str) -> GraphResult<Option<T>> {
        let payload = self
            .nodes
            .remove(id)
            .ok_or_else(|| GraphError::node_not_found(id))?;

        let successors = self.adjacency.remove(id).unwrap_or_default();
        let predecessors = self.reverse.remove(id).unwrap_or_default();

        for succ in &successors {
            if let Some(sources) = self.reverse.get_mut(succ) {
                sources.remove(id);
            }
        }
        for pred in &predecessors {
            if let Some(targets) = self.adjacency.get_mut(pred) {
                targets.remove(id);
            }
        }

        debug!(
            node = %id,
            dropped_out_edges = successors.len(),
            dropped_in_edges = predecessors.len(),
            "removed node"
        );

        Ok(payload)
    }

    /// The payload bound to `id`, if the node exists and is hydrated.
    pub fn get_node(&self, id: &str) -> Option<&T> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut T> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` exists but has no payload bound yet.
    pub fn is_placeholder(&self, id: &str) -> bool {
        matches!(self.nodes.get(id), Some(None))
    }

    /// Ids of nodes still waiting to be hydrated.
    pub fn placeholder_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, slot)| slot.is_none())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// All node ids, in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Add the edge `source -> target`.
    ///
    /// Adding an edge that already exists is a no-op. An edge that would
    /// close a cycle is rolled back and reported as
    /// [`GraphError::CycleDetected`]; the graph stays usable.
    pub fn add_edge(&mut self, source: &str, target: &str) -> GraphResult<()> {
        self.ensure_node(source)?;
        self.ensure_node(target)?;

        if self.has_edge(source, target) {
            debug!(source, target, "edge already present; nothing to do");
            return Ok(());
        }

        self.link(source, target);

        if self.detect_cycle() {
            self.unlink(source, target);
            let path = self.cycle_path(source, target);
            warn!(source, target, path = ?path, "rejected edge: would create a cycle");
            return Err(GraphError::CycleDetected {
                from: source.to_string(),
                to: target.to_string(),
                path,
            });
        }

        debug!(source, target, "added edge");
        Ok(())
    }

    /// Remove the edge `source -> target`. Removing a missing edge between
    /// two existing nodes is a no-op.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> GraphResult<()> {
        self.ensure_node(source)?;
        self.ensure_node(target)?;

        if self.unlink(source, target) {
            debug!(source, target, "removed edge");
        }
        Ok(())
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.adjacency
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Every edge as a `(source, target)` pair.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.adjacency
            .iter()
            .flat_map(|(source, targets)| {
                targets
                    .iter()
                    .map(move |target| (source.clone(), target.clone()))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// Direct downstream nodes of `id`.
    pub fn successors(&self, id: &str) -> GraphResult<Vec<NodeId>> {
        Ok(self.out_set(id)?.iter().cloned().collect())
    }

    /// Direct upstream nodes of `id`.
    pub fn predecessors(&self, id: &str) -> GraphResult<Vec<NodeId>> {
        Ok(self.in_set(id)?.iter().cloned().collect())
    }

    pub fn in_degree(&self, id: &str) -> GraphResult<usize> {
        Ok(self.in_set(id)?.len())
    }

    pub fn out_degree(&self, id: &str) -> GraphResult<usize> {
        Ok(self.out_set(id)?.len())
    }

    fn ensure_node(&self, id: &str) -> GraphResult<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::node_not_found(id))
        }
    }

    pub(super) fn out_set(&self, id: &str) -> GraphResult<&BTreeSet<NodeId>> {
        self.ensure_node(id)?;
        Ok(self.adjacency.get(id).unwrap_or(&NO_NEIGHBOURS))
    }

    pub(super) fn in_set(&self, id: &str) -> GraphResult<&BTreeSet<NodeId>> {
        self.ensure_node(id)?;
        Ok(self.reverse.get(id).unwrap_or(&NO_NEIGHBOURS))
    }

    fn link(&mut self, source: &str, target: &str) {
        self.adjacency
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
        self.reverse
            .entry(target.to_string())
            .or_default()
            .insert(source.to_string());
    }

    /// Returns `true` if an edge was actually removed.
    fn unlink(&mut self, source: &str, target: &str) -> bool {
        let removed = self
            .adjacency
            .get_mut(source)
            .is_some_and(|targets| targets.remove(target));
        if let Some(sources) = self.reverse.get_mut(target) {
            sources.remove(source);
        }
        removed
    }

    /// Explain why `source -> target` closes a cycle.
    ///
    /// Breadth-first search from `target` back to `source` along existing
    /// edges; the first path found wins, so it is valid but not necessarily
    /// the shortest cycle through the edge.
    fn cycle_path(&self, source: &str, target: &str) -> Vec<NodeId> {
        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::from([target]);
        let mut found = target == source;

        while !found {
            let Some(node) = queue.pop_front() else {
                break;
            };
            for next in self.adjacency.get(node).unwrap_or(&NO_NEIGHBOURS) {
                let next = next.as_str();
                if next == target || parent.contains_key(next) {
                    continue;
                }
                parent.insert(next, node);
                if next == source {
                    found = true;
                    break;
                }
                queue.push_back(next);
            }
        }

        if !found {
            // Only reachable if the caller misjudged the cycle; fall back to
            // the bare edge so the error still names both endpoints.
            return vec![source.to_string(), target.to_string()];
        }

        let mut back = vec![source];
        let mut cursor = source;
        while cursor != target {
            match parent.get(cursor) {
                Some(&prev) => {
                    back.push(prev);
                    cursor = prev;
                }
                None => break,
            }
        }
        back.push(source);
        back.reverse();
        back.into_iter().map(str::to_string).collect()
    }
}
