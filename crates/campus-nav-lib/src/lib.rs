//! Campus navigation library entry points.
//!
//! This crate turns campus floor-plan data into a routing graph, weights that
//! graph for a rider's accessibility needs, finds the lowest-cost path, and
//! renders it as step-by-step instructions. Higher-level consumers (the CLI,
//! a mobile backend) should only depend on the functions exported here
//! instead of reimplementing behavior.

pub mod builder;
pub mod campus;
pub mod config;
pub mod cost;
pub mod error;
pub mod graph;
pub mod output;
pub mod path;
pub mod route;
pub mod routing;
pub mod store;

pub use builder::build_graph;
pub use campus::{load_campus, Campus};
pub use config::{EngineConfig, GraphBuildOptions, TravelConfig};
pub use cost::{edge_cost, AccessibilityProfile};
pub use error::{BuildError, Error, Result, RouteError};
pub use graph::{FloorId, FloorInfo, GraphEdge, GraphNode, MapGraph, NodeId, TraversalKind};
pub use output::{render_route, RouteRenderMode, RouteSummary};
pub use path::{find_route, find_route_a_star, NodePath};
pub use route::{build_route, Route, RouteSegment};
pub use routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest, Waypoint};
pub use store::SharedGraph;
