use std::path::PathBuf;

use thiserror::Error;

use crate::graph::{FloorId, NodeId};

/// Convenient result alias for the campus navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised by path search, waypoint resolution, or route synthesis.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Raised while turning campus source data into a routing graph.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Raised when an accessibility profile carries unusable values.
    #[error("invalid accessibility profile: {message}")]
    InvalidProfile { message: String },

    /// Raised when engine configuration fails validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a campus document could not be parsed.
    #[error("failed to parse campus data from {path}: {message}")]
    CampusFormat { path: PathBuf, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced to callers of path search and route synthesis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Start or destination is not present in the graph.
    #[error("location not found: {id}{}", format_suggestions(.suggestions))]
    UnknownNode { id: String, suggestions: Vec<String> },

    /// A position waypoint named a floor the graph does not know.
    #[error("floor not found: {id}")]
    UnknownFloor { id: FloorId },

    /// The endpoints are not connected under the active accessibility constraints.
    #[error("no accessible route found between {start} and {goal}; try relaxing accessibility constraints")]
    NoPath { start: NodeId, goal: NodeId },

    /// A path referenced an edge that does not join its hop.
    #[error("no usable edge between {from} and {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    /// Summing edge lengths produced a negative or non-finite distance.
    #[error("route distance is not a finite, non-negative number")]
    InvalidDistance,
}

/// Errors raised while building a [`crate::graph::MapGraph`]. Construction is
/// all-or-nothing: any of these aborts the build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("duplicate node identifier: {id}")]
    DuplicateNode { id: NodeId },

    #[error("duplicate floor identifier: {id}")]
    DuplicateFloor { id: FloorId },

    /// A node, POI, or connector landing references a floor that does not exist.
    #[error("{referenced_by} references unknown floor {floor}")]
    UnknownFloor {
        referenced_by: String,
        floor: FloorId,
    },

    /// An edge endpoint does not resolve to a node.
    #[error("edge {from} -> {to} references unknown node {missing}")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// A floor-level link joins nodes on another floor.
    #[error("link {from} -> {to} declared on floor {floor} leaves that floor")]
    CrossFloorLink {
        from: NodeId,
        to: NodeId,
        floor: FloorId,
    },

    /// A vertical connector has two landings on the same floor.
    #[error("connector {connector} has more than one landing on floor {floor}")]
    DuplicateLanding { connector: String, floor: FloorId },

    /// A connector name is shared by stair and elevator landings.
    #[error("connector {connector} mixes stairs and elevator landings")]
    MixedConnector { connector: String },

    #[error("invalid geometry for {subject}: {message}")]
    InvalidGeometry { subject: String, message: String },

    #[error("invalid graph build options: {message}")]
    InvalidOptions { message: String },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
