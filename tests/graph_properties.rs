// tests/graph_properties.rs

use std::collections::{HashMap, HashSet};

use depgraph::dag::DependencyGraph;
use depgraph::errors::GraphError;
use depgraph::export::to_petgraph;
use petgraph::algo::is_cyclic_directed;
use proptest::prelude::*;

// Arbitrary edge attempts between up to `max_nodes` nodes. Unlike a
// pre-sanitised DAG, this includes back edges and self loops, so the
// cycle guard is exercised as often as the happy path.
fn edge_attempts(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_nodes).prop_flat_map(|n| {
        let edges = proptest::collection::vec((0..n, 0..n), 0..(n * 3));
        (Just(n), edges)
    })
}

fn name(i: usize) -> String {
    format!("n{i:02}")
}

/// Build a graph by attempting every edge; returns the graph and the
/// attempts that were rejected as cycles.
fn build(n: usize, attempts: &[(usize, usize)]) -> (DependencyGraph<usize>, Vec<(usize, usize)>) {
    let mut graph = DependencyGraph::new();
    for i in 0..n {
        graph.add_node(name(i), i).unwrap();
    }

    let mut rejected = Vec::new();
    for &(s, t) in attempts {
        let before = graph.edges();
        match graph.add_edge(&name(s), &name(t)) {
            Ok(()) => {}
            Err(GraphError::CycleDetected { path, .. }) => {
                // Rolled back, and the path is a closed walk through the
                // rejected edge over edges the graph really has.
                assert_eq!(graph.edges(), before);
                assert_eq!(path.first(), Some(&name(s)));
                assert_eq!(path.last(), Some(&name(s)));
                assert_eq!(path.get(1), Some(&name(t)));
                for pair in path[1..].windows(2) {
                    assert!(
                        graph.has_edge(&pair[0], &pair[1]),
                        "{} -> {} is not an edge",
                        pair[0],
                        pair[1]
                    );
                }
                rejected.push((s, t));
            }
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    (graph, rejected)
}

proptest! {
    #[test]
    fn accepted_edges_never_form_a_cycle((n, attempts) in edge_attempts(12)) {
        let (graph, _) = build(n, &attempts);

        prop_assert!(!graph.detect_cycle());
        prop_assert!(!is_cyclic_directed(&to_petgraph(&graph)));
        prop_assert!(graph.validate().iter().all(|p| !p.contains("cycle")));
    }

    #[test]
    fn rejected_edges_really_close_a_cycle((n, attempts) in edge_attempts(10)) {
        let (graph, rejected) = build(n, &attempts);

        for (s, t) in rejected {
            let mut pg = to_petgraph(&graph);
            let from = pg.node_indices().find(|i| pg[*i] == name(s)).unwrap();
            let to = pg.node_indices().find(|i| pg[*i] == name(t)).unwrap();
            pg.add_edge(from, to, ());
            prop_assert!(is_cyclic_directed(&pg));
        }
    }

    #[test]
    fn topological_order_respects_every_edge((n, attempts) in edge_attempts(12)) {
        let (graph, _) = build(n, &attempts);
        let order = graph.topological_sort().unwrap();

        prop_assert_eq!(order.len(), n);
        let position: HashMap<&str, usize> =
            order.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
        for (s, t) in graph.edges() {
            prop_assert!(position[s.as_str()] < position[t.as_str()]);
        }
    }

    #[test]
    fn draining_ready_nodes_completes_the_graph((n, attempts) in edge_attempts(12)) {
        let (graph, _) = build(n, &attempts);
        let mut completed: HashSet<String> = HashSet::new();

        // Each round must make progress on an acyclic graph.
        for _ in 0..=n {
            let ready = graph.get_ready_nodes(&completed);
            if ready.is_empty() {
                break;
            }
            for id in ready.iter() {
                prop_assert!(!completed.contains(id));
                for pred in graph.predecessors(id).unwrap() {
                    prop_assert!(completed.contains(&pred));
                }
            }
            completed.extend(ready);
        }

        prop_assert_eq!(completed.len(), n);
    }

    #[test]
    fn removing_a_node_cascades((n, attempts) in edge_attempts(10), victim in 0usize..10) {
        let (mut graph, _) = build(n, &attempts);
        let victim = name(victim % n);

        let payload = graph.remove_node(&victim).unwrap();
        prop_assert!(payload.is_some());
        prop_assert!(!graph.contains_node(&victim));
        prop_assert!(graph.edges().iter().all(|(s, t)| *s != victim && *t != victim));
        prop_assert_eq!(graph.topological_sort().unwrap().len(), n - 1);
    }
}
