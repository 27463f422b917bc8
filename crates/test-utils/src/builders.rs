use depgraph::config::{NodeConfig, RawWorkflowFile, WorkflowFile};
use depgraph::dag::DependencyGraph;
use depgraph::types::GraphConfig;

/// Builder for `DependencyGraph<String>`; each payload is the node's id.
///
/// Nodes named only by an edge are added on the fly, so
/// `GraphBuilder::new().edge("a", "b").build()` has two nodes.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    pub fn node(mut self, id: &str) -> Self {
        self.push_node(id);
        self
    }

    pub fn nodes(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.push_node(id);
        }
        self
    }

    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.push_node(source);
        self.push_node(target);
        self.edges.push((source.to_string(), target.to_string()));
        self
    }

    /// `a -> b -> c -> ...` over the given ids.
    pub fn chain(mut self, ids: &[&str]) -> Self {
        for pair in ids.windows(2) {
            self = self.edge(pair[0], pair[1]);
        }
        if let [only] = ids {
            self.push_node(only);
        }
        self
    }

    pub fn build(self) -> DependencyGraph<String> {
        let mut graph = DependencyGraph::with_config(self.config);
        for id in self.nodes {
            graph
                .add_node(id.clone(), id)
                .expect("GraphBuilder ids are unique");
        }
        for (source, target) in self.edges.iter() {
            graph
                .add_edge(source, target)
                .expect("GraphBuilder edges must not form a cycle");
        }
        graph
    }

    fn push_node(&mut self, id: &str) {
        if !self.nodes.iter().any(|n| n == id) {
            self.nodes.push(id.to_string());
        }
    }
}

/// Builder for workflow files, either as a validated `WorkflowFile` or as
/// TOML text to write to disk.
#[derive(Debug, Default)]
pub struct WorkflowFileBuilder {
    raw: RawWorkflowFile,
}

impl WorkflowFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.raw.graph.name = name.to_string();
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.raw.graph.max_retries = retries;
        self
    }

    pub fn timeout(mut self, secs: f64) -> Self {
        self.raw.graph.timeout = Some(secs);
        self
    }

    pub fn fail_fast(mut self, val: bool) -> Self {
        self.raw.graph.fail_fast = val;
        self
    }

    pub fn with_node(mut self, node: NodeSpecBuilder) -> Self {
        let (name, config) = node.into_parts();
        self.raw.node.insert(name, config);
        self
    }

    pub fn build(self) -> WorkflowFile {
        WorkflowFile::try_from(self.raw).expect("Failed to build valid workflow from builder")
    }

    pub fn to_toml(&self) -> String {
        toml::to_string(&self.raw).expect("workflow file serializes to TOML")
    }
}

/// Builder for a single `[node.<id>]` section.
#[derive(Debug, Clone)]
pub struct NodeSpecBuilder {
    name: String,
    config: NodeConfig,
}

impl NodeSpecBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: NodeConfig::default(),
        }
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.config.kind = Some(kind.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.config.description = Some(text.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.config.after.push(dep.to_string());
        self
    }

    fn into_parts(self) -> (String, NodeConfig) {
        (self.name, self.config)
    }
}
