use std::cmp::Ordering;
use std::time::Duration;

use serde::Serialize;

use crate::config::TravelConfig;
use crate::error::RouteError;
use crate::graph::{FloorId, GraphEdge, GraphNode, MapGraph, TraversalKind};
use crate::path::NodePath;

/// One instruction-sized piece of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub start: GraphNode,
    pub end: GraphNode,
    pub kind: TraversalKind,
    /// Floor the rider is on when the segment ends.
    pub floor: FloorId,
    pub instruction: String,
    /// Physical length, never the accessibility-weighted cost.
    pub distance: f64,
    /// Floors climbed or descended; zero for walk and ramp segments.
    pub floors_crossed: u32,
}

/// Ordered, human-readable result of a route request.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Route {
    pub segments: Vec<RouteSegment>,
    pub distance: f64,
    pub eta_seconds: f64,
}

impl Route {
    /// Route for a request whose start is its destination.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn eta(&self) -> Duration {
        Duration::try_from_secs_f64(self.eta_seconds).unwrap_or_default()
    }

    pub fn instructions(&self) -> Vec<&str> {
        self.segments
            .iter()
            .map(|segment| segment.instruction.as_str())
            .collect()
    }

    /// Whether any segment is of the given kind.
    pub fn uses(&self, kind: TraversalKind) -> bool {
        self.segments.iter().any(|segment| segment.kind == kind)
    }

    /// Every segment starts where the previous one ended.
    pub fn is_contiguous(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].end.id == pair[1].start.id)
    }
}

/// Convert a search result into a [`Route`].
///
/// Consecutive hops of the same kind on the floor where the current segment
/// ends collapse into one segment, as do consecutive rides through the same
/// stair or elevator in one direction.
pub fn build_route(
    path: &NodePath,
    graph: &MapGraph,
    travel: &TravelConfig,
) -> Result<Route, RouteError> {
    if path.edges().is_empty() {
        return Ok(Route::empty());
    }

    let nodes = path.nodes();
    if path.edges().len() + 1 != nodes.len() {
        return Err(RouteError::MissingEdge {
            from: nodes.first().cloned().unwrap_or_else(|| "".into()),
            to: nodes.last().cloned().unwrap_or_else(|| "".into()),
        });
    }

    let mut segments: Vec<RouteSegment> = Vec::new();
    let mut pending: Option<PendingSegment<'_>> = None;

    for (pair, &edge_id) in nodes.windows(2).zip(path.edges()) {
        let missing = || RouteError::MissingEdge {
            from: pair[0].clone(),
            to: pair[1].clone(),
        };
        let edge = graph
            .edge(edge_id)
            .filter(|edge| edge.traverse_from(pair[0].as_str()) == Some(&pair[1]))
            .ok_or_else(missing)?;
        let from = graph.node(pair[0].as_str()).ok_or_else(missing)?;
        let to = graph.node(pair[1].as_str()).ok_or_else(missing)?;

        let hop = Hop::new(graph, edge, from, to);
        match pending.as_mut() {
            Some(current) if current.accepts(&hop) => current.extend(&hop),
            _ => {
                if let Some(done) = pending.take() {
                    segments.push(done.finish(graph));
                }
                pending = Some(PendingSegment::start(&hop));
            }
        }
    }
    if let Some(done) = pending.take() {
        segments.push(done.finish(graph));
    }

    let distance: f64 = segments.iter().map(|segment| segment.distance).sum();
    if !distance.is_finite() || distance < 0.0 {
        return Err(RouteError::InvalidDistance);
    }

    let eta_seconds = estimate_seconds(&segments, distance, travel);
    Ok(Route {
        segments,
        distance,
        eta_seconds,
    })
}

fn estimate_seconds(segments: &[RouteSegment], distance: f64, travel: &TravelConfig) -> f64 {
    let walking = if travel.walking_speed > 0.0 {
        distance / travel.walking_speed
    } else {
        0.0
    };

    let transitions: f64 = segments
        .iter()
        .map(|segment| {
            let floors = f64::from(segment.floors_crossed);
            match segment.kind {
                TraversalKind::Stairs => floors * travel.stairs_seconds_per_floor,
                TraversalKind::Elevator => {
                    travel.elevator_seconds_per_ride + floors * travel.elevator_seconds_per_floor
                }
                TraversalKind::Walk | TraversalKind::Ramp => 0.0,
            }
        })
        .sum();

    walking + transitions
}

struct Hop<'g> {
    edge: &'g GraphEdge,
    from: &'g GraphNode,
    to: &'g GraphNode,
    /// Signed level change; zero for same-floor hops.
    level_delta: i32,
}

impl<'g> Hop<'g> {
    fn new(graph: &MapGraph, edge: &'g GraphEdge, from: &'g GraphNode, to: &'g GraphNode) -> Self {
        let level = |node: &GraphNode| graph.floor(node.floor.as_str()).map(|f| f.level);
        let level_delta = match (level(from), level(to)) {
            (Some(a), Some(b)) => b - a,
            _ => 0,
        };
        Self {
            edge,
            from,
            to,
            level_delta,
        }
    }

    fn floors_crossed(&self) -> u32 {
        if self.edge.kind().is_floor_transition() {
            self.level_delta.unsigned_abs().max(1)
        } else {
            0
        }
    }
}

struct PendingSegment<'g> {
    start: &'g GraphNode,
    end: &'g GraphNode,
    kind: TraversalKind,
    connector: Option<&'g str>,
    direction: Ordering,
    distance: f64,
    floors_crossed: u32,
}

impl<'g> PendingSegment<'g> {
    fn start(hop: &Hop<'g>) -> Self {
        Self {
            start: hop.from,
            end: hop.to,
            kind: hop.edge.kind(),
            connector: hop.edge.attrs.connector.as_deref(),
            direction: hop.level_delta.cmp(&0),
            distance: hop.edge.base_cost,
            floors_crossed: hop.floors_crossed(),
        }
    }

    fn accepts(&self, hop: &Hop<'g>) -> bool {
        if hop.edge.kind() != self.kind {
            return false;
        }
        if self.kind.is_floor_transition() {
            // Continue riding the same shaft/stairwell in the same direction.
            self.connector.is_some()
                && self.connector == hop.edge.attrs.connector.as_deref()
                && self.direction == hop.level_delta.cmp(&0)
        } else {
            hop.from.floor == self.end.floor && hop.to.floor == self.end.floor
        }
    }

    fn extend(&mut self, hop: &Hop<'g>) {
        self.end = hop.to;
        self.distance += hop.edge.base_cost;
        self.floors_crossed += hop.floors_crossed();
    }

    fn finish(self, graph: &MapGraph) -> RouteSegment {
        let floor_name = || match graph.floor(self.end.floor.as_str()) {
            Some(floor) => floor.level.to_string(),
            None => self.end.floor.to_string(),
        };
        let instruction = match self.kind {
            TraversalKind::Walk => format!("Walk to {}", self.end.landmark()),
            TraversalKind::Stairs => format!("Take the stairs to Floor {}", floor_name()),
            TraversalKind::Elevator => format!("Take the elevator to Floor {}", floor_name()),
            TraversalKind::Ramp => format!("Use the ramp to {}", self.end.landmark()),
        };

        RouteSegment {
            start: self.start.clone(),
            end: self.end.clone(),
            kind: self.kind,
            floor: self.end.floor.clone(),
            instruction,
            distance: self.distance,
            floors_crossed: self.floors_crossed,
        }
    }
}
