// src/dag/mod.rs

//! Dependency graph and the queries built on it.
//!
//! - [`graph`] holds [`DependencyGraph`]: nodes, edges and cycle prevention.
//! - [`analysis`] adds topological ordering, cycle detection and validation.
//! - [`readiness`] answers "what can run now" for an external scheduler.
//! - [`snapshot`] converts a graph to and from a structural snapshot.
//! - [`payload`] defines how payloads describe themselves in a snapshot.
//! - [`shared`] wraps a graph in a single mutex for multi-threaded callers.

pub mod analysis;
pub mod graph;
pub mod payload;
pub mod readiness;
pub mod shared;
pub mod snapshot;

pub use graph::DependencyGraph;
pub use payload::NodePayload;
pub use shared::SharedGraph;
pub use snapshot::{GraphSnapshot, NodeDescriptor};
