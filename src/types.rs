use serde::{Deserialize, Serialize};

/// Canonical node id type used throughout the crate.
pub type NodeId = String;

/// Metadata carried alongside a graph for whatever executor runs it.
///
/// The graph stores and serializes these fields but never acts on them:
/// retry policy, timeouts and fail-fast behaviour belong to the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Timeout in seconds, if any.
    #[serde(default)]
    pub timeout: Option<f64>,

    #[serde(default)]
    pub fail_fast: bool,
}

fn default_name() -> String {
    "default".to_string()
}

fn default_max_retries() -> u32 {
    3
}

impl GraphConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            max_retries: default_max_retries(),
            timeout: None,
            fail_fast: false,
        }
    }
}
