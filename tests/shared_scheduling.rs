// tests/shared_scheduling.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

use depgraph::dag::SharedGraph;
use depgraph_test_utils::{GraphBuilder, init_tracing};

/// Workers poll the shared graph for ready nodes and claim them one at a
/// time; every node must run exactly once and after all of its
/// predecessors.
#[test]
fn test_workers_drain_graph_in_dependency_order() {
    init_tracing();

    let graph = GraphBuilder::new()
        .chain(&["fetch", "score", "notify"])
        .edge("fetch", "enrich")
        .edge("enrich", "notify")
        .node("audit")
        .build();
    let total = graph.len();
    let shared = SharedGraph::new(graph);

    let completed: Arc<Mutex<HashSet<String>>> = Arc::default();
    let claimed: Arc<Mutex<HashSet<String>>> = Arc::default();
    let log: Arc<Mutex<Vec<String>>> = Arc::default();

    thread::scope(|scope| {
        for _ in 0..3 {
            let shared = shared.clone();
            let completed = Arc::clone(&completed);
            let claimed = Arc::clone(&claimed);
            let log = Arc::clone(&log);

            scope.spawn(move || {
                loop {
                    let next = {
                        let done = completed.lock().unwrap();
                        if done.len() == total {
                            break;
                        }
                        let ready = shared.get_ready_nodes(&*done);
                        let mut claimed = claimed.lock().unwrap();
                        let pick = ready.into_iter().find(|id| !claimed.contains(id));
                        if let Some(id) = &pick {
                            claimed.insert(id.clone());
                        }
                        pick
                    };

                    match next {
                        Some(id) => {
                            log.lock().unwrap().push(id.clone());
                            completed.lock().unwrap().insert(id);
                        }
                        None => thread::yield_now(),
                    }
                }
            });
        }
    });

    let log = log.lock().unwrap();
    assert_eq!(log.len(), total);
    assert_eq!(log.iter().collect::<HashSet<_>>().len(), total);

    let position = |id: &str| log.iter().position(|n| n == id).unwrap();
    for (source, target) in shared.edges() {
        assert!(position(&source) < position(&target), "{source} ran after {target}");
    }
}
