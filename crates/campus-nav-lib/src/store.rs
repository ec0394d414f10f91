//! Shared, swappable routing graph.
//!
//! Searches run against an immutable [`MapGraph`] snapshot. When campus data
//! changes, a new graph is built off to the side and swapped in; searches
//! already in flight finish on the snapshot they started with.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::builder::build_graph;
use crate::campus::Campus;
use crate::config::{EngineConfig, GraphBuildOptions};
use crate::error::{BuildError, Result};
use crate::graph::MapGraph;
use crate::routing::{plan_route, RoutePlan, RouteRequest};

/// Cheaply cloneable handle to the current routing graph.
///
/// Clones share the same slot, so a swap through one handle is seen by all
/// of them.
///
/// # Example
///
/// ```ignore
/// let shared = SharedGraph::new(build_graph(&campus, &options)?);
/// let worker = shared.clone();
/// std::thread::spawn(move || {
///     let graph = worker.snapshot();
///     // ... search against `graph`
/// });
/// shared.rebuild(&updated_campus, &options)?;
/// ```
#[derive(Clone)]
pub struct SharedGraph {
    inner: Arc<RwLock<Arc<MapGraph>>>,
}

impl SharedGraph {
    pub fn new(graph: MapGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(graph))),
        }
    }

    /// The graph currently in service. Hold the returned `Arc` for the whole
    /// search.
    pub fn snapshot(&self) -> Arc<MapGraph> {
        // The slot only ever holds a complete graph.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new graph and return the one it replaced.
    pub fn replace(&self, graph: MapGraph) -> Arc<MapGraph> {
        self.install(Arc::new(graph))
    }

    fn install(&self, next: Arc<MapGraph>) -> Arc<MapGraph> {
        let (nodes, edges) = (next.node_count(), next.edge_count());
        let previous = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, next)
        };
        info!(nodes, edges, "routing graph replaced");
        previous
    }

    /// Build a graph from `campus` and swap it in. On failure the current
    /// graph stays in service.
    pub fn rebuild(
        &self,
        campus: &Campus,
        options: &GraphBuildOptions,
    ) -> std::result::Result<Arc<MapGraph>, BuildError> {
        let graph = Arc::new(build_graph(campus, options)?);
        self.install(Arc::clone(&graph));
        Ok(graph)
    }

    /// Plan a route against the current snapshot.
    pub fn plan(&self, request: &RouteRequest, config: &EngineConfig) -> Result<RoutePlan> {
        let graph = self.snapshot();
        plan_route(&graph, request, config)
    }
}

impl From<MapGraph> for SharedGraph {
    fn from(graph: MapGraph) -> Self {
        Self::new(graph)
    }
}

impl std::fmt::Debug for SharedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.snapshot();
        f.debug_struct("SharedGraph")
            .field("nodes", &graph.node_count())
            .field("edges", &graph.edge_count())
            .finish()
    }
}
