//! Route planning strategies.
//!
//! Each [`RoutePlanner`] wraps one search algorithm so [`super::plan_route`]
//! can stay agnostic of how the path is found.

use crate::cost::AccessibilityProfile;
use crate::error::RouteError;
use crate::graph::MapGraph;
use crate::path::{find_route, find_route_a_star, NodePath};

use super::RouteAlgorithm;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Find the lowest-cost path between two resolved nodes.
    fn find_path(
        &self,
        graph: &MapGraph,
        start: &str,
        goal: &str,
        profile: &AccessibilityProfile,
    ) -> Result<NodePath, RouteError>;

    /// Whether this planner uses node coordinates to guide the search.
    fn uses_heuristic(&self) -> bool {
        false
    }
}

/// Dijkstra's algorithm over accessibility-weighted edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &MapGraph,
        start: &str,
        goal: &str,
        profile: &AccessibilityProfile,
    ) -> Result<NodePath, RouteError> {
        find_route(graph, start, goal, profile)
    }
}

/// A* guided by straight-line distance.
///
/// Falls back to uninformed search on graphs whose coordinates do not bound
/// edge costs, so results always match [`DijkstraPlanner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &MapGraph,
        start: &str,
        goal: &str,
        profile: &AccessibilityProfile,
    ) -> Result<NodePath, RouteError> {
        find_route_a_star(graph, start, goal, profile)
    }

    fn uses_heuristic(&self) -> bool {
        true
    }
}

/// Select the planner for a requested algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}
