// src/dag/shared.rs

//! Thread-safe handle around a [`DependencyGraph`].
//!
//! One mutex guards every read and write. Graphs here are small and every
//! operation is at most O(V + E), so a single lock is enough.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dag::graph::DependencyGraph;
use crate::errors::GraphResult;
use crate::types::NodeId;

/// Cloneable, lock-protected graph handle.
///
/// Clones share the same underlying graph. Use [`SharedGraph::with_graph`]
/// or [`SharedGraph::with_graph_mut`] for anything that must observe several
/// steps atomically.
#[derive(Debug)]
pub struct SharedGraph<T> {
    inner: Arc<Mutex<DependencyGraph<T>>>,
}

impl<T> Clone for SharedGraph<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<DependencyGraph<T>> for SharedGraph<T> {
    fn from(graph: DependencyGraph<T>) -> Self {
        Self::new(graph)
    }
}

impl<T> SharedGraph<T> {
    pub fn new(graph: DependencyGraph<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    /// Lock the graph. A poisoned lock is recovered: graph mutations either
    /// complete or leave the graph untouched, so the data is still coherent.
    fn lock(&self) -> MutexGuard<'_, DependencyGraph<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_graph<R>(&self, f: impl FnOnce(&DependencyGraph<T>) -> R) -> R {
        f(&*self.lock())
    }

    pub fn with_graph_mut<R>(&self, f: impl FnOnce(&mut DependencyGraph<T>) -> R) -> R {
        f(&mut *self.lock())
    }

    pub fn add_node(&self, id: impl Into<NodeId>, payload: T) -> GraphResult<()> {
        self.lock().add_node(id, payload)
    }

    pub fn remove_node(&self, id: &str) -> GraphResult<Option<T>> {
        self.lock().remove_node(id)
    }

    pub fn add_edge(&self, source: &str, target: &str) -> GraphResult<()> {
        self.lock().add_edge(source, target)
    }

    pub fn remove_edge(&self, source: &str, target: &str) -> GraphResult<()> {
        self.lock().remove_edge(source, target)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.lock().contains_node(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.lock().nodes().map(str::to_string).collect()
    }

    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.lock().edges()
    }

    pub fn get_ready_nodes<S>(&self, completed: &HashSet<S>) -> Vec<NodeId>
    where
        S: Borrow<str> + Hash + Eq,
    {
        self.lock().get_ready_nodes(completed)
    }

    pub fn topological_sort(&self) -> GraphResult<Vec<NodeId>> {
        self.lock().topological_sort()
    }

    pub fn validate(&self) -> Vec<String> {
        self.lock().validate()
    }

    /// Unwrap the graph if this is the last handle; otherwise hand the
    /// handle back.
    pub fn try_into_inner(self) -> Result<DependencyGraph<T>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }
}
