// src/dag/analysis.rs

//! Whole-graph analysis: ordering, cycle checks and structural warnings.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::collections::btree_set;

use tracing::{debug, warn};

use crate::dag::graph::{DependencyGraph, NO_NEIGHBOURS};
use crate::errors::{GraphError, GraphResult};
use crate::types::NodeId;

/// DFS colouring. Unvisited nodes are simply absent from the mark map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

impl<T> DependencyGraph<T> {
    /// Total order over all nodes such that every edge `u -> v` has `u`
    /// before `v` (Kahn's algorithm).
    ///
    /// Among nodes that become ready at the same time the order is
    /// unspecified. If the order cannot cover every node the graph holds a
    /// cycle and [`GraphError::GraphValidation`] is returned, even though
    /// [`DependencyGraph::add_edge`] should make that impossible.
    pub fn topological_sort(&self) -> GraphResult<Vec<NodeId>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut in_degree: HashMap<&str, usize> = self
            .nodes
            .keys()
            .map(|id| (id.as_str(), self.reverse.get(id).map_or(0, BTreeSet::len)))
            .collect();

        let mut queue: VecDeque<&str> = self
            .nodes
            .keys()
            .map(String::as_str)
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();

        let mut order = Vec::with_capacity(self.len());

        while let Some(node) = queue.pop_front() {
            order.push(node.to_string());

            for succ in self.adjacency.get(node).unwrap_or(&NO_NEIGHBOURS) {
                if let Some(degree) = in_degree.get_mut(succ.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(succ.as_str());
                    }
                }
            }
        }

        if order.len() != self.len() {
            let blocked: Vec<&str> = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(id, _)| *id)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            warn!(?blocked, "topological sort could not order every node");
            return Err(GraphError::validation(vec![format!(
                "graph contains a cycle; unable to order: {}",
                blocked.join(", ")
            )]));
        }

        Ok(order)
    }

    /// Whether any node can reach itself.
    ///
    /// Three-colour depth-first search started from every node, so cycles in
    /// components unreachable from the first node are still found. Iterative,
    /// so long chains do not grow the call stack.
    pub fn detect_cycle(&self) -> bool {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.len());

        for start in self.nodes.keys() {
            if marks.contains_key(start.as_str()) {
                continue;
            }

            let mut stack: Vec<(&str, btree_set::Iter<'_, NodeId>)> =
                vec![(start.as_str(), self.neighbours_out(start))];
            marks.insert(start.as_str(), Mark::InProgress);

            loop {
                let Some((node, successors)) = stack.last_mut() else {
                    break;
                };
                let node = *node;

                match successors.next() {
                    Some(next) => match marks.get(next.as_str()) {
                        Some(Mark::InProgress) => {
                            debug!(from = node, to = %next, "back edge found");
                            return true;
                        }
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(next.as_str(), Mark::InProgress);
                            stack.push((next.as_str(), self.neighbours_out(next)));
                        }
                    },
                    None => {
                        marks.insert(node, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    /// Structural problems as human-readable strings. Never fails.
    ///
    /// Isolated nodes (no edges at all) are legal; they are reported as a
    /// warning so the caller can decide whether they are intentional.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.detect_cycle() {
            problems.push("graph contains a cycle".to_string());
        }

        let isolated = self.isolated_nodes();
        if !isolated.is_empty() {
            problems.push(format!("isolated nodes detected: {}", isolated.join(", ")));
        }

        problems
    }

    /// Nodes with neither predecessors nor successors.
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .filter(|id| {
                self.adjacency.get(*id).is_none_or(BTreeSet::is_empty)
                    && self.reverse.get(*id).is_none_or(BTreeSet::is_empty)
            })
            .cloned()
            .collect()
    }

    /// Group nodes into the batches an executor would see if it ran every
    /// ready node at once and waited for the whole batch to finish.
    pub fn execution_waves(&self) -> GraphResult<Vec<Vec<NodeId>>> {
        let mut completed: HashSet<NodeId> = HashSet::with_capacity(self.len());
        let mut waves = Vec::new();

        while completed.len() < self.len() {
            let ready = self.get_ready_nodes(&completed);
            if ready.is_empty() {
                let mut stuck: Vec<&str> = self
                    .nodes()
                    .filter(|id| !completed.contains(*id))
                    .collect();
                stuck.sort_unstable();
                return Err(GraphError::validation(vec![format!(
                    "no node can make progress; blocked: {}",
                    stuck.join(", ")
                )]));
            }
            completed.extend(ready.iter().cloned());
            waves.push(ready);
        }

        Ok(waves)
    }

    /// Every node `id` transitively depends on.
    pub fn ancestors(&self, id: &str) -> GraphResult<Vec<NodeId>> {
        self.in_set(id)?;
        Ok(self.reachable(id, |node| self.reverse.get(node)))
    }

    /// Every node that transitively depends on `id`.
    pub fn descendants(&self, id: &str) -> GraphResult<Vec<NodeId>> {
        self.out_set(id)?;
        Ok(self.reachable(id, |node| self.adjacency.get(node)))
    }

    fn reachable<'g, F>(&'g self, start: &str, step: F) -> Vec<NodeId>
    where
        F: Fn(&str) -> Option<&'g BTreeSet<NodeId>>,
    {
        let mut seen: BTreeSet<&'g str> = BTreeSet::new();
        let mut stack: Vec<&'g str> = step(start)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            stack.extend(step(node).into_iter().flatten().map(String::as_str));
        }

        seen.into_iter().map(str::to_string).collect()
    }

    fn neighbours_out(&self, id: &str) -> btree_set::Iter<'_, NodeId> {
        self.adjacency.get(id).unwrap_or(&NO_NEIGHBOURS).iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph<()> {
        let mut g = DependencyGraph::new();
        for n in nodes {
            g.add_node(*n, ()).unwrap();
        }
        for (s, t) in edges {
            g.add_edge(s, t).unwrap();
        }
        g
    }

    fn position(order: &[NodeId], id: &str) -> usize {
        order.iter().position(|n| n == id).unwrap()
    }

    #[test]
    fn empty_graph_sorts_to_nothing() {
        let g: DependencyGraph<()> = DependencyGraph::new();
        assert!(g.topological_sort().unwrap().is_empty());
        assert!(g.execution_waves().unwrap().is_empty());
        assert!(g.validate().is_empty());
    }

    #[test]
    fn linear_chain_sorts_in_order() {
        let g = build(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(g.topological_sort().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn diamond_respects_every_edge() {
        let edges = [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")];
        let g = build(&["d", "c", "b", "a"], &edges);
        let order = g.topological_sort().unwrap();
        assert_eq!(order.len(), 4);
        for (s, t) in edges {
            assert!(position(&order, s) < position(&order, t), "{s} before {t}");
        }
    }

    #[test]
    fn sort_reports_cycle_if_invariant_is_broken() {
        let mut g = build(&["a", "b", "c"], &[("a", "b")]);
        // Bypass add_edge to simulate a corrupted graph.
        g.adjacency.get_mut("b").unwrap().insert("a".into());
        g.reverse.get_mut("a").unwrap().insert("b".into());

        assert!(g.detect_cycle());
        match g.topological_sort().unwrap_err() {
            GraphError::GraphValidation { problems } => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("a, b"));
            }
            other => panic!("expected GraphValidation, got {other:?}"),
        }
        assert!(g.execution_waves().is_err());
    }

    #[test]
    fn detect_cycle_checks_disconnected_components() {
        let mut g = build(&["a", "b", "x", "y"], &[("a", "b"), ("x", "y")]);
        assert!(!g.detect_cycle());

        g.adjacency.get_mut("y").unwrap().insert("x".into());
        g.reverse.get_mut("x").unwrap().insert("y".into());
        assert!(g.detect_cycle());
    }

    #[test]
    fn validate_flags_isolated_nodes_only() {
        let g = build(&["a", "b", "lonely"], &[("a", "b")]);
        assert_eq!(g.validate(), vec!["isolated nodes detected: lonely"]);
        assert_eq!(g.isolated_nodes(), vec!["lonely"]);
    }

    #[test]
    fn validate_mentions_cycle_iff_detect_cycle() {
        let mut g = build(&["a", "b"], &[("a", "b")]);
        assert!(!g.validate().iter().any(|p| p.contains("cycle")));

        g.adjacency.get_mut("b").unwrap().insert("a".into());
        g.reverse.get_mut("a").unwrap().insert("b".into());
        assert!(g.validate().iter().any(|p| p.contains("cycle")));
    }

    #[test]
    fn waves_group_parallel_work() {
        let g = build(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let waves = g.execution_waves().unwrap();
        assert_eq!(waves, vec![vec!["a", "e"], vec!["b", "c"], vec!["d"]]);
    }

    #[test]
    fn ancestors_and_descendants_are_transitive() {
        let g = build(
            &["a", "b", "c", "d", "x"],
            &[("a", "b"), ("b", "c"), ("a", "d")],
        );
        assert_eq!(g.ancestors("c").unwrap(), vec!["a", "b"]);
        assert_eq!(g.descendants("a").unwrap(), vec!["b", "c", "d"]);
        assert!(g.descendants("x").unwrap().is_empty());
        assert!(g.ancestors("nope").is_err());
    }
}
