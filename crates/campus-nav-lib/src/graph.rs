use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Relative slack when comparing an edge length against the straight-line
/// distance between its endpoints.
const PLANAR_TOLERANCE: f64 = 1e-9;

/// Minimum Jaro-Winkler score for a node id or label to be offered as a
/// "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Unique identifier of a node in the routing graph.
    NodeId
);

string_id!(
    /// Unique identifier of a floor (or outdoor area).
    FloorId
);

/// Index of an edge inside [`MapGraph::edges`].
pub type EdgeId = usize;

/// How an edge is traversed. Exactly one kind per edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraversalKind {
    #[default]
    Walk,
    Stairs,
    Elevator,
    Ramp,
}

impl TraversalKind {
    /// Stairs and elevators move the rider between floors.
    pub fn is_floor_transition(self) -> bool {
        matches!(self, TraversalKind::Stairs | TraversalKind::Elevator)
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TraversalKind::Walk => "walk",
            TraversalKind::Stairs => "stairs",
            TraversalKind::Elevator => "elevator",
            TraversalKind::Ramp => "ramp",
        };
        f.write_str(value)
    }
}

/// Structural role of a node, derived from the source feature that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Door,
    #[default]
    Junction,
    Stairs,
    Elevator,
    Ramp,
    Entrance,
    Amenity,
}

/// A point in navigable space: hallway junction, door, or stair/elevator landing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub floor: FloorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub role: NodeRole,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64, floor: impl Into<FloorId>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            floor: floor.into(),
            label: None,
            role: NodeRole::Junction,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }

    /// Straight-line distance to another node in the shared planar frame.
    pub fn planar_distance(&self, other: &GraphNode) -> f64 {
        planar_distance(self.x, self.y, other.x, other.y)
    }

    /// Human-readable landmark: the label when present, else the coordinate.
    pub fn landmark(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("({:.1}, {:.1})", self.x, self.y),
        }
    }
}

/// Descriptive attributes of an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EdgeAttributes {
    pub kind: TraversalKind,
    /// Only `from -> to` is traversable when set.
    #[serde(default)]
    pub one_way: bool,
    /// Shared structural identifier of the stair/elevator this edge belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<String>,
}

impl EdgeAttributes {
    pub fn new(kind: TraversalKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// A walkable segment between two nodes, referenced by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length of the segment; never the accessibility-weighted cost.
    pub base_cost: f64,
    pub attrs: EdgeAttributes,
}

impl GraphEdge {
    pub fn new(
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        base_cost: f64,
        kind: TraversalKind,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            base_cost,
            attrs: EdgeAttributes::new(kind),
        }
    }

    pub fn one_way(mut self) -> Self {
        self.attrs.one_way = true;
        self
    }

    pub fn with_connector(mut self, connector: impl Into<String>) -> Self {
        self.attrs.connector = Some(connector.into());
        self
    }

    pub fn kind(&self) -> TraversalKind {
        self.attrs.kind
    }

    /// Node reached when leaving `node` along this edge, honouring `one_way`.
    pub fn traverse_from(&self, node: &str) -> Option<&NodeId> {
        if self.from.as_str() == node {
            Some(&self.to)
        } else if self.to.as_str() == node && !self.attrs.one_way {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Floor (or outdoor area) metadata used when phrasing instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorInfo {
    pub id: FloorId,
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FloorInfo {
    pub fn new(id: impl Into<FloorId>, level: i32) -> Self {
        Self {
            id: id.into(),
            level,
            building: None,
            name: None,
        }
    }
}

/// Outgoing traversal option from a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    pub edge: EdgeId,
    pub target: NodeId,
}

/// Graph of nodes and edges for a whole campus.
///
/// Immutable once constructed, so a single instance can be shared across
/// threads (usually behind an `Arc`, see [`crate::store::SharedGraph`]).
#[derive(Debug, Clone, Default)]
pub struct MapGraph {
    nodes: HashMap<NodeId, GraphNode>,
    edges: Vec<GraphEdge>,
    floors: HashMap<FloorId, FloorInfo>,
    adjacency: HashMap<NodeId, Vec<Adjacency>>,
    planar_consistent: bool,
}

impl MapGraph {
    /// Assemble a graph, rejecting duplicate identifiers, unknown floors,
    /// edges with unresolved endpoints, and non-finite geometry.
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        floors: Vec<FloorInfo>,
    ) -> Result<Self, BuildError> {
        let mut floor_map = HashMap::with_capacity(floors.len());
        for floor in floors {
            if floor_map.contains_key(&floor.id) {
                return Err(BuildError::DuplicateFloor { id: floor.id });
            }
            floor_map.insert(floor.id.clone(), floor);
        }

        let mut node_map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(BuildError::InvalidGeometry {
                    subject: format!("node {}", node.id),
                    message: "coordinates must be finite".to_string(),
                });
            }
            if !floor_map.contains_key(&node.floor) {
                return Err(BuildError::UnknownFloor {
                    referenced_by: format!("node {}", node.id),
                    floor: node.floor,
                });
            }
            if node_map.contains_key(&node.id) {
                return Err(BuildError::DuplicateNode { id: node.id });
            }
            node_map.insert(node.id.clone(), node);
        }

        let mut adjacency: HashMap<NodeId, Vec<Adjacency>> = node_map
            .keys()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        let mut planar_consistent = true;

        for (index, edge) in edges.iter().enumerate() {
            let (Some(from), Some(to)) = (node_map.get(&edge.from), node_map.get(&edge.to)) else {
                let missing = if node_map.contains_key(&edge.from) {
                    edge.to.clone()
                } else {
                    edge.from.clone()
                };
                return Err(BuildError::DanglingEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing,
                });
            };

            if !edge.base_cost.is_finite() || edge.base_cost < 0.0 {
                return Err(BuildError::InvalidGeometry {
                    subject: format!("edge {} -> {}", edge.from, edge.to),
                    message: format!("length {} must be finite and non-negative", edge.base_cost),
                });
            }

            let straight = from.planar_distance(to);
            if edge.base_cost + PLANAR_TOLERANCE * straight.max(1.0) < straight {
                planar_consistent = false;
            }

            if let Some(out) = adjacency.get_mut(&edge.from) {
                out.push(Adjacency {
                    edge: index,
                    target: edge.to.clone(),
                });
            }
            if !edge.attrs.one_way && edge.from != edge.to {
                if let Some(out) = adjacency.get_mut(&edge.to) {
                    out.push(Adjacency {
                        edge: index,
                        target: edge.from.clone(),
                    });
                }
            }
        }

        Ok(Self {
            nodes: node_map,
            edges,
            floors: floor_map,
            adjacency,
            planar_consistent,
        })
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn floor(&self, id: &str) -> Option<&FloorInfo> {
        self.floors.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn floors(&self) -> impl Iterator<Item = &FloorInfo> {
        self.floors.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Traversable edges leaving `node`, in edge insertion order.
    pub fn neighbours(&self, node: &str) -> &[Adjacency] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edges that can be traversed from `from` to `to`.
    pub fn edges_between<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> impl Iterator<Item = (EdgeId, &'a GraphEdge)> + 'a {
        self.neighbours(from)
            .iter()
            .filter(move |adj| adj.target.as_str() == to)
            .filter_map(move |adj| self.edges.get(adj.edge).map(|edge| (adj.edge, edge)))
    }

    /// Whether every edge is at least as long as the straight line between
    /// its endpoints. When true, straight-line distance never overestimates
    /// the remaining cost of a route.
    pub fn is_planar_consistent(&self) -> bool {
        self.planar_consistent
    }

    /// Closest node on `floor` to the given coordinate. Ties resolve to the
    /// lowest node id.
    pub fn nearest_node(&self, floor: &str, x: f64, y: f64) -> Option<&GraphNode> {
        self.nodes
            .values()
            .filter(|node| node.floor.as_str() == floor)
            .map(|node| (planar_distance(node.x, node.y, x, y), node))
            .min_by(|(da, a), (db, b)| compare_distance(*da, *db).then_with(|| a.id.cmp(&b.id)))
            .map(|(_, node)| node)
    }

    /// Case-insensitive exact match on node labels. When several nodes share
    /// a label the lowest id wins.
    pub fn find_by_label(&self, label: &str) -> Option<&GraphNode> {
        let wanted = label.trim().to_lowercase();
        self.nodes
            .values()
            .filter(|node| {
                node.label
                    .as_deref()
                    .map(|l| l.to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .min_by(|a, b| a.id.cmp(&b.id))
    }

    /// Node ids and labels that resemble `query`, best match first.
    pub fn suggest_nodes(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();
        let mut scored: Vec<(f64, String)> = Vec::new();
        for node in self.nodes.values() {
            let candidates = std::iter::once(node.id.as_str()).chain(node.label.as_deref());
            for candidate in candidates {
                let score = strsim::jaro_winkler(&query, &candidate.to_lowercase());
                if score >= SUGGESTION_THRESHOLD {
                    scored.push((score, candidate.to_string()));
                }
            }
        }

        scored.sort_by(|a, b| compare_distance(b.0, a.0).then_with(|| a.1.cmp(&b.1)));
        let mut suggestions: Vec<String> = Vec::new();
        for (_, candidate) in scored {
            if suggestions.len() == limit {
                break;
            }
            if !suggestions.contains(&candidate) {
                suggestions.push(candidate);
            }
        }
        suggestions
    }
}

pub(crate) fn planar_distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (ax - bx).hypot(ay - by)
}

pub(crate) fn compare_distance(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_floor_graph() -> MapGraph {
        MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1").with_label("Lobby"),
                GraphNode::new("b", 3.0, 4.0, "f1"),
                GraphNode::new("c", 0.0, 0.0, "f2"),
            ],
            vec![
                GraphEdge::new("a", "b", 5.0, TraversalKind::Walk),
                GraphEdge::new("a", "c", 12.0, TraversalKind::Elevator).one_way(),
            ],
            vec![FloorInfo::new("f1", 1), FloorInfo::new("f2", 2)],
        )
        .expect("valid graph")
    }

    #[test]
    fn neighbours_respect_one_way_edges() {
        let graph = two_floor_graph();
        let from_a: Vec<_> = graph
            .neighbours("a")
            .iter()
            .map(|adj| adj.target.as_str())
            .collect();
        assert_eq!(from_a, vec!["b", "c"]);
        assert!(graph.neighbours("c").is_empty());
        assert_eq!(graph.neighbours("b")[0].target.as_str(), "a");
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let err = MapGraph::new(
            vec![GraphNode::new("a", 0.0, 0.0, "f1")],
            vec![GraphEdge::new("a", "ghost", 1.0, TraversalKind::Walk)],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect_err("ghost endpoint");
        assert_eq!(
            err,
            BuildError::DanglingEdge {
                from: NodeId::from("a"),
                to: NodeId::from("ghost"),
                missing: NodeId::from("ghost"),
            }
        );
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let err = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("a", 1.0, 0.0, "f1"),
            ],
            Vec::new(),
            vec![FloorInfo::new("f1", 1)],
        )
        .expect_err("duplicate id");
        assert!(matches!(err, BuildError::DuplicateNode { .. }));
    }

    #[test]
    fn negative_length_is_rejected() {
        let err = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("b", 1.0, 0.0, "f1"),
            ],
            vec![GraphEdge::new("a", "b", -1.0, TraversalKind::Walk)],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect_err("negative length");
        assert!(matches!(err, BuildError::InvalidGeometry { .. }));
    }

    #[test]
    fn short_edges_clear_planar_consistency() {
        let graph = two_floor_graph();
        assert!(graph.is_planar_consistent());

        let shortcut = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("b", 10.0, 0.0, "f1"),
            ],
            vec![GraphEdge::new("a", "b", 2.0, TraversalKind::Walk)],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect("valid graph");
        assert!(!shortcut.is_planar_consistent());
    }

    #[test]
    fn nearest_node_stays_on_requested_floor() {
        let graph = two_floor_graph();
        let nearest = graph.nearest_node("f1", 2.9, 3.9).expect("node on f1");
        assert_eq!(nearest.id.as_str(), "b");
        let upstairs = graph.nearest_node("f2", 100.0, 100.0).expect("node on f2");
        assert_eq!(upstairs.id.as_str(), "c");
        assert!(graph.nearest_node("f9", 0.0, 0.0).is_none());
    }

    #[test]
    fn labels_and_suggestions() {
        let graph = two_floor_graph();
        assert_eq!(graph.find_by_label("lobby").map(|n| n.id.as_str()), Some("a"));
        assert_eq!(graph.suggest_nodes("Lobbby", 3), vec!["Lobby".to_string()]);
    }

    #[test]
    fn landmark_falls_back_to_coordinates() {
        let node = GraphNode::new("j", 1.3, -3.0, "f1");
        assert_eq!(node.landmark(), "(1.3, -3.0)");
    }
}
