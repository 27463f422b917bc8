// src/config/mod.rs

//! Workflow files for depgraph.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a workflow file or JSON snapshot from disk (`loader.rs`).
//! - Validate references and acyclicity before a graph is handed out (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_from_path, load_graph};
pub use model::{NodeConfig, NodeSpec, RawWorkflowFile, WorkflowFile};
pub use validate::validate_workflow;
