//! Route planning for campus navigation.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`Waypoint`] - How a caller names a start or destination
//! - [`RouteRequest`] - High-level route planning request
//! - [`RoutePlan`] - Planned route result
//! - [`plan_route`] - Main entry point for computing routes
//!
//! # Example
//!
//! ```ignore
//! use campus_nav_lib::{build_graph, load_campus, plan_route, EngineConfig, RouteRequest};
//!
//! let campus = load_campus("docs/fixtures/sample_campus.json".as_ref())?;
//! let config = EngineConfig::default();
//! let graph = build_graph(&campus, &config.graph)?;
//! let request = RouteRequest::new("Robotics Lab (101)", "Reading Room (201)");
//! let plan = plan_route(&graph, &request, &config)?;
//! println!("{} segments", plan.route.segments.len());
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::cost::AccessibilityProfile;
use crate::error::{Result, RouteError};
use crate::graph::{FloorId, MapGraph, NodeId};
use crate::path::NodePath;
use crate::route::{build_route, Route};

/// Number of fuzzy suggestions attached to an unresolved waypoint.
const MAX_SUGGESTIONS: usize = 3;

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (uninformed, weighted).
    #[default]
    Dijkstra,
    /// A* search guided by straight-line distance.
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// Start or destination of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Waypoint {
    /// Node id, or a node label such as "Robotics Lab (101)".
    Node(String),
    /// A located position, snapped to the nearest node on its floor.
    Position { floor: FloorId, x: f64, y: f64 },
}

impl Waypoint {
    pub fn position(floor: impl Into<FloorId>, x: f64, y: f64) -> Self {
        Waypoint::Position {
            floor: floor.into(),
            x,
            y,
        }
    }
}

impl From<&str> for Waypoint {
    fn from(value: &str) -> Self {
        Waypoint::Node(value.to_string())
    }
}

impl From<String> for Waypoint {
    fn from(value: String) -> Self {
        Waypoint::Node(value)
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waypoint::Node(name) => f.write_str(name),
            Waypoint::Position { floor, x, y } => write!(f, "{floor} ({x:.1}, {y:.1})"),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: Waypoint,
    pub destination: Waypoint,
    pub profile: AccessibilityProfile,
    pub algorithm: RouteAlgorithm,
}

impl RouteRequest {
    /// Request with the default profile and Dijkstra search.
    pub fn new(start: impl Into<Waypoint>, destination: impl Into<Waypoint>) -> Self {
        Self {
            start: start.into(),
            destination: destination.into(),
            profile: AccessibilityProfile::default(),
            algorithm: RouteAlgorithm::default(),
        }
    }

    pub fn with_profile(mut self, profile: AccessibilityProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub destination: NodeId,
    /// Accessibility-weighted cost the search minimized.
    pub cost: f64,
    pub path: NodePath,
    pub route: Route,
}

impl RoutePlan {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.path.hop_count()
    }

    /// Number of stair and elevator edges traversed.
    pub fn floor_transitions(&self, graph: &MapGraph) -> usize {
        self.path.floor_transitions(graph)
    }
}

/// Resolve a waypoint to a node id.
pub fn resolve_waypoint(graph: &MapGraph, waypoint: &Waypoint) -> Result<NodeId> {
    match waypoint {
        Waypoint::Node(name) => {
            if let Some(node) = graph.node(name) {
                return Ok(node.id.clone());
            }
            if let Some(node) = graph.find_by_label(name) {
                return Ok(node.id.clone());
            }
            Err(RouteError::UnknownNode {
                id: name.clone(),
                suggestions: graph.suggest_nodes(name, MAX_SUGGESTIONS),
            }
            .into())
        }
        Waypoint::Position { floor, x, y } => {
            if graph.floor(floor.as_str()).is_none() {
                return Err(RouteError::UnknownFloor { id: floor.clone() }.into());
            }
            graph
                .nearest_node(floor.as_str(), *x, *y)
                .map(|node| node.id.clone())
                .ok_or_else(|| {
                    RouteError::UnknownNode {
                        id: waypoint.to_string(),
                        suggestions: Vec::new(),
                    }
                    .into()
                })
        }
    }
}

/// Plan a route between two waypoints.
pub fn plan_route(
    graph: &MapGraph,
    request: &RouteRequest,
    config: &EngineConfig,
) -> Result<RoutePlan> {
    request.profile.validate()?;
    config.validate()?;

    let start = resolve_waypoint(graph, &request.start)?;
    let destination = resolve_waypoint(graph, &request.destination)?;

    let planner = select_planner(request.algorithm);
    debug!(
        algorithm = %planner.algorithm(),
        guided = planner.uses_heuristic() && graph.is_planar_consistent(),
        %start,
        %destination,
        elevators_only = request.profile.elevators_only,
        stairs_allowed = request.profile.stairs_allowed,
        stairs_penalty = request.profile.stairs_penalty,
        "planning route"
    );

    let path = planner.find_path(
        graph,
        start.as_str(),
        destination.as_str(),
        &request.profile,
    )?;
    let route = build_route(&path, graph, &config.travel)?;

    debug!(
        %start,
        %destination,
        segments = route.segments.len(),
        distance = route.distance,
        eta_seconds = route.eta_seconds,
        "route planned"
    );

    Ok(RoutePlan {
        algorithm: planner.algorithm(),
        start,
        destination,
        cost: path.cost(),
        path,
        route,
    })
}
