use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;

use crate::cost::{edge_cost, AccessibilityProfile};
use crate::error::RouteError;
use crate::graph::{EdgeId, GraphNode, MapGraph, NodeId, TraversalKind};

/// Relative tolerance under which two accumulated costs count as equal for
/// tie-breaking.
const COST_EPSILON: f64 = 1e-9;

/// Number of fuzzy suggestions attached to an unknown-node error.
const MAX_SUGGESTIONS: usize = 3;

/// Ordered node sequence produced by path search, with the edge used for
/// every hop.
///
/// Parallel edges are common (a stair and an elevator between the same two
/// landings), so the edge list is what makes a path unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePath {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    cost: f64,
}

impl NodePath {
    /// Resolve a bare node sequence against the graph, choosing the cheapest
    /// edge the profile permits for every hop.
    pub fn from_nodes(
        graph: &MapGraph,
        nodes: &[NodeId],
        profile: &AccessibilityProfile,
    ) -> Result<Self, RouteError> {
        for id in nodes {
            ensure_known(graph, id.as_str())?;
        }

        let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
        let mut cost = 0.0;
        for pair in nodes.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let (edge_id, hop_cost) = graph
                .edges_between(from.as_str(), to.as_str())
                .filter_map(|(id, edge)| edge_cost(edge, profile).map(|c| (id, c, edge.kind())))
                .min_by(|a, b| {
                    compare_cost(a.1, b.1)
                        .then_with(|| a.2.is_floor_transition().cmp(&b.2.is_floor_transition()))
                        .then_with(|| a.0.cmp(&b.0))
                })
                .map(|(id, c, _)| (id, c))
                .ok_or_else(|| RouteError::MissingEdge {
                    from: from.clone(),
                    to: to.clone(),
                })?;
            edges.push(edge_id);
            cost += hop_cost;
        }

        Ok(Self {
            nodes: nodes.to_vec(),
            edges,
            cost,
        })
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Total accessibility-weighted cost. Not a physical distance.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn start(&self) -> Option<&NodeId> {
        self.nodes.first()
    }

    pub fn destination(&self) -> Option<&NodeId> {
        self.nodes.last()
    }

    /// Number of edges in the path.
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of stairs/elevator edges.
    pub fn floor_transitions(&self, graph: &MapGraph) -> usize {
        self.edges
            .iter()
            .filter_map(|&id| graph.edge(id))
            .filter(|edge| edge.kind().is_floor_transition())
            .count()
    }

    /// The nodes of the path, in order.
    pub fn resolve<'g>(&self, graph: &'g MapGraph) -> Vec<&'g GraphNode> {
        self.nodes
            .iter()
            .filter_map(|id| graph.node(id.as_str()))
            .collect()
    }
}

/// Check that every hop of `path` uses an edge that joins its two nodes, can
/// be traversed in that direction, and is not excluded by `profile`.
pub fn validate_path(
    graph: &MapGraph,
    path: &NodePath,
    profile: &AccessibilityProfile,
) -> Result<(), RouteError> {
    if path.edges.len() != path.nodes.len().saturating_sub(1) {
        let from = path.nodes.first().cloned().unwrap_or_else(|| NodeId::from(""));
        let to = path.nodes.last().cloned().unwrap_or_else(|| NodeId::from(""));
        return Err(RouteError::MissingEdge { from, to });
    }

    for (pair, &edge_id) in path.nodes.windows(2).zip(&path.edges) {
        let (from, to) = (&pair[0], &pair[1]);
        let usable = graph
            .edge(edge_id)
            .filter(|edge| edge.traverse_from(from.as_str()) == Some(to))
            .and_then(|edge| edge_cost(edge, profile))
            .is_some();
        if !usable {
            return Err(RouteError::MissingEdge {
                from: from.clone(),
                to: to.clone(),
            });
        }
    }
    Ok(())
}

/// Find the lowest-cost route between `start` and `goal` under `profile`
/// using Dijkstra's algorithm.
///
/// Equal-cost candidates are ordered by fewest floor transitions, then
/// fewest edges, then node id, so repeated calls return the same path.
/// Costs within a relative 1e-9 of each other count as equal.
pub fn find_route(
    graph: &MapGraph,
    start: &str,
    goal: &str,
    profile: &AccessibilityProfile,
) -> Result<NodePath, RouteError> {
    search(graph, start, goal, profile, |_| 0.0)
}

/// A* variant of [`find_route`] guided by straight-line distance to the goal.
///
/// The heuristic is only used when the graph is planar-consistent and the
/// stairs penalty does not shrink costs; otherwise this degrades to
/// Dijkstra. Either way the returned path has the same cost and tie-break
/// as [`find_route`].
pub fn find_route_a_star(
    graph: &MapGraph,
    start: &str,
    goal: &str,
    profile: &AccessibilityProfile,
) -> Result<NodePath, RouteError> {
    let goal_node = graph.node(goal).cloned();
    let admissible = graph.is_planar_consistent() && profile.stairs_penalty >= 1.0;
    search(graph, start, goal, profile, move |node| match &goal_node {
        Some(target) if admissible => node.planar_distance(target),
        _ => 0.0,
    })
}

fn ensure_known(graph: &MapGraph, id: &str) -> Result<(), RouteError> {
    if graph.contains_node(id) {
        Ok(())
    } else {
        Err(RouteError::UnknownNode {
            id: id.to_string(),
            suggestions: graph.suggest_nodes(id, MAX_SUGGESTIONS),
        })
    }
}

fn search<H>(
    graph: &MapGraph,
    start: &str,
    goal: &str,
    profile: &AccessibilityProfile,
    heuristic: H,
) -> Result<NodePath, RouteError>
where
    H: Fn(&GraphNode) -> f64,
{
    ensure_known(graph, start)?;
    ensure_known(graph, goal)?;

    let start_id = NodeId::from(start);
    let goal_id = NodeId::from(goal);
    if start == goal {
        return Ok(NodePath {
            nodes: vec![start_id],
            edges: Vec::new(),
            cost: 0.0,
        });
    }

    let estimate = |id: &NodeId| graph.node(id.as_str()).map(&heuristic).unwrap_or(0.0);

    let mut best: HashMap<NodeId, Label> = HashMap::new();
    let mut parents: HashMap<NodeId, (NodeId, EdgeId)> = HashMap::new();
    let mut queue = BinaryHeap::new();
    // Cost at which the goal was first reached. Entries whose priority is
    // within the tie tolerance of it are still expanded, so an equal-cost
    // path with fewer floor transitions can replace the first one.
    let mut goal_cost: Option<f64> = None;

    best.insert(start_id.clone(), Label::ORIGIN);
    queue.push(QueueEntry::new(
        start_id.clone(),
        Label::ORIGIN,
        estimate(&start_id),
    ));

    while let Some(entry) = queue.pop() {
        if let Some(limit) = goal_cost {
            if compare_cost(entry.priority.0, limit) == Ordering::Greater {
                break;
            }
        }
        // Skip entries superseded by a better label pushed later.
        if best.get(&entry.node) != Some(&entry.label) {
            continue;
        }
        if entry.node == goal_id {
            if goal_cost.is_none() {
                goal_cost = Some(entry.label.cost);
            }
            continue;
        }

        for adjacency in graph.neighbours(entry.node.as_str()) {
            let Some(edge) = graph.edge(adjacency.edge) else {
                continue;
            };
            let Some(step_cost) = edge_cost(edge, profile) else {
                continue;
            };

            let candidate = entry.label.extend(step_cost, edge.kind());
            let improves = best
                .get(&adjacency.target)
                .map(|current| candidate.cmp_rank(current) == Ordering::Less)
                .unwrap_or(true);
            if improves {
                best.insert(adjacency.target.clone(), candidate);
                parents.insert(
                    adjacency.target.clone(),
                    (entry.node.clone(), adjacency.edge),
                );
                queue.push(QueueEntry::new(
                    adjacency.target.clone(),
                    candidate,
                    estimate(&adjacency.target),
                ));
            }
        }
    }

    if goal_cost.is_none() {
        tracing::debug!(start, goal, "no route under active accessibility constraints");
        return Err(RouteError::NoPath {
            start: start_id,
            goal: goal_id,
        });
    }

    let path = reconstruct_path(graph, profile, &parents, &start_id, &goal_id);
    tracing::debug!(
        start,
        goal,
        cost = path.cost,
        hops = path.hop_count(),
        "route found"
    );
    Ok(path)
}

fn reconstruct_path(
    graph: &MapGraph,
    profile: &AccessibilityProfile,
    parents: &HashMap<NodeId, (NodeId, EdgeId)>,
    start: &NodeId,
    goal: &NodeId,
) -> NodePath {
    let mut nodes = vec![goal.clone()];
    let mut edges = Vec::new();
    let mut current = goal;
    while current != start && edges.len() <= parents.len() {
        let Some((parent, edge)) = parents.get(current) else {
            break;
        };
        nodes.push(parent.clone());
        edges.push(*edge);
        current = parent;
    }
    nodes.reverse();
    edges.reverse();

    let cost = edges
        .iter()
        .filter_map(|&id| graph.edge(id))
        .filter_map(|edge| edge_cost(edge, profile))
        .sum();
    NodePath { nodes, edges, cost }
}

fn compare_cost(a: f64, b: f64) -> Ordering {
    if !a.is_finite() || !b.is_finite() {
        return a.total_cmp(&b);
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    if (a - b).abs() <= COST_EPSILON * scale {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Search label: accumulated cost plus the tie-break counters.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Label {
    cost: f64,
    transitions: usize,
    hops: usize,
}

impl Label {
    const ORIGIN: Label = Label {
        cost: 0.0,
        transitions: 0,
        hops: 0,
    };

    fn extend(&self, step_cost: f64, kind: TraversalKind) -> Label {
        Label {
            cost: self.cost + step_cost,
            transitions: self.transitions + usize::from(kind.is_floor_transition()),
            hops: self.hops + 1,
        }
    }

    fn cmp_rank(&self, other: &Label) -> Ordering {
        compare_cost(self.cost, other.cost)
            .then_with(|| self.transitions.cmp(&other.transitions))
            .then_with(|| self.hops.cmp(&other.hops))
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Clone, Debug)]
struct QueueEntry {
    node: NodeId,
    label: Label,
    priority: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, label: Label, heuristic: f64) -> Self {
        Self {
            node,
            label,
            priority: FloatOrd(label.cost + heuristic),
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.label.transitions.cmp(&self.label.transitions))
            .then_with(|| other.label.hops.cmp(&self.label.hops))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FloorInfo, GraphEdge};

    /// Square a-b-d / a-c-d where both sides cost the same; the a-c-d side
    /// uses an elevator.
    fn diamond() -> MapGraph {
        MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("b", 0.0, 0.0, "f1"),
                GraphNode::new("c", 0.0, 0.0, "f1"),
                GraphNode::new("d", 0.0, 0.0, "f1"),
            ],
            vec![
                GraphEdge::new("a", "c", 2.0, TraversalKind::Elevator),
                GraphEdge::new("c", "d", 2.0, TraversalKind::Walk),
                GraphEdge::new("a", "b", 2.0, TraversalKind::Walk),
                GraphEdge::new("b", "d", 2.0, TraversalKind::Walk),
            ],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect("valid graph")
    }

    fn ids(path: &NodePath) -> Vec<&str> {
        path.nodes().iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn equal_cost_prefers_fewer_floor_transitions() {
        let graph = diamond();
        let path = find_route(&graph, "a", "d", &AccessibilityProfile::unrestricted())
            .expect("route");
        assert_eq!(ids(&path), vec!["a", "b", "d"]);
        assert_eq!(path.cost(), 4.0);
    }

    #[test]
    fn equal_cost_and_transitions_prefers_fewer_edges() {
        let graph = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("m", 0.0, 0.0, "f1"),
                GraphNode::new("z", 0.0, 0.0, "f1"),
            ],
            vec![
                GraphEdge::new("a", "m", 1.5, TraversalKind::Walk),
                GraphEdge::new("m", "z", 1.5, TraversalKind::Walk),
                GraphEdge::new("a", "z", 3.0, TraversalKind::Walk),
            ],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect("valid graph");
        let path = find_route(&graph, "a", "z", &AccessibilityProfile::unrestricted())
            .expect("route");
        assert_eq!(ids(&path), vec!["a", "z"]);
    }

    #[test]
    fn trivial_route_has_no_edges() {
        let graph = diamond();
        let path = find_route(&graph, "b", "b", &AccessibilityProfile::default()).expect("route");
        assert_eq!(ids(&path), vec!["b"]);
        assert_eq!(path.hop_count(), 0);
        assert_eq!(path.cost(), 0.0);
    }

    #[test]
    fn unknown_endpoints_are_reported() {
        let graph = diamond();
        let err = find_route(&graph, "a", "zz", &AccessibilityProfile::default())
            .expect_err("unknown goal");
        assert!(matches!(err, RouteError::UnknownNode { ref id, .. } if id == "zz"));
    }

    #[test]
    fn one_way_edges_are_not_walked_backwards() {
        let graph = MapGraph::new(
            vec![
                GraphNode::new("top", 0.0, 0.0, "f1"),
                GraphNode::new("bottom", 0.0, 0.0, "f1"),
            ],
            vec![GraphEdge::new("top", "bottom", 4.0, TraversalKind::Ramp).one_way()],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect("valid graph");
        let profile = AccessibilityProfile::default();
        assert!(find_route(&graph, "top", "bottom", &profile).is_ok());
        assert!(matches!(
            find_route(&graph, "bottom", "top", &profile),
            Err(RouteError::NoPath { .. })
        ));
    }

    #[test]
    fn from_nodes_picks_cheapest_permitted_edge() {
        let graph = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("b", 0.0, 0.0, "f2"),
            ],
            vec![
                GraphEdge::new("a", "b", 5.0, TraversalKind::Stairs),
                GraphEdge::new("a", "b", 8.0, TraversalKind::Elevator),
            ],
            vec![FloorInfo::new("f1", 1), FloorInfo::new("f2", 2)],
        )
        .expect("valid graph");
        let nodes = vec![NodeId::from("a"), NodeId::from("b")];

        let cheap = NodePath::from_nodes(&graph, &nodes, &AccessibilityProfile::unrestricted())
            .expect("path");
        assert_eq!(cheap.edges(), &[0]);

        let no_stairs =
            NodePath::from_nodes(&graph, &nodes, &AccessibilityProfile::elevators_only())
                .expect("path");
        assert_eq!(no_stairs.edges(), &[1]);
        assert_eq!(no_stairs.cost(), 8.0);
    }

    #[test]
    fn validate_path_rejects_excluded_edges() {
        let graph = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("b", 0.0, 0.0, "f2"),
            ],
            vec![GraphEdge::new("a", "b", 5.0, TraversalKind::Stairs)],
            vec![FloorInfo::new("f1", 1), FloorInfo::new("f2", 2)],
        )
        .expect("valid graph");
        let path = find_route(&graph, "a", "b", &AccessibilityProfile::unrestricted())
            .expect("route");
        assert!(validate_path(&graph, &path, &AccessibilityProfile::unrestricted()).is_ok());
        assert!(validate_path(&graph, &path, &AccessibilityProfile::elevators_only()).is_err());
    }

    /// Elevator straight to the goal at 0.3, or a walk costing
    /// 0.1 + 0.2 + 0.0 that rounds to 0.30000000000000004.
    fn rounding_tie() -> MapGraph {
        MapGraph::new(
            vec![
                GraphNode::new("s", 0.0, 0.0, "f1"),
                GraphNode::new("m", 0.0, 0.0, "f1"),
                GraphNode::new("n", 0.0, 0.0, "f1"),
                GraphNode::new("g", 0.0, 0.0, "f1"),
            ],
            vec![
                GraphEdge::new("s", "g", 0.3, TraversalKind::Elevator),
                GraphEdge::new("s", "m", 0.1, TraversalKind::Walk),
                GraphEdge::new("m", "n", 0.2, TraversalKind::Walk),
                GraphEdge::new("n", "g", 0.0, TraversalKind::Walk),
            ],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect("valid graph")
    }

    #[test]
    fn rounding_level_ties_prefer_fewer_floor_transitions() {
        let graph = rounding_tie();
        let profile = AccessibilityProfile::unrestricted();
        let dijkstra = find_route(&graph, "s", "g", &profile).expect("route");
        assert_eq!(ids(&dijkstra), vec!["s", "m", "n", "g"]);
        assert_eq!(dijkstra.floor_transitions(&graph), 0);

        let a_star = find_route_a_star(&graph, "s", "g", &profile).expect("route");
        assert_eq!(ids(&a_star), ids(&dijkstra));
    }

    #[test]
    fn rounding_level_ties_are_resolved_at_intermediate_nodes() {
        let graph = MapGraph::new(
            ["s", "m", "n", "x", "z"]
                .map(|id| GraphNode::new(id, 0.0, 0.0, "f1"))
                .to_vec(),
            vec![
                GraphEdge::new("s", "x", 0.3, TraversalKind::Elevator),
                GraphEdge::new("s", "m", 0.1, TraversalKind::Walk),
                GraphEdge::new("m", "n", 0.2, TraversalKind::Walk),
                GraphEdge::new("n", "x", 0.0, TraversalKind::Walk),
                GraphEdge::new("x", "z", 1.0, TraversalKind::Walk),
            ],
            vec![FloorInfo::new("f1", 1)],
        )
        .expect("valid graph");

        let path = find_route(&graph, "s", "z", &AccessibilityProfile::unrestricted())
            .expect("route");
        assert_eq!(ids(&path), vec!["s", "m", "n", "x", "z"]);
    }

    #[test]
    fn overflowing_stairs_cost_loses_to_elevator() {
        let graph = MapGraph::new(
            vec![
                GraphNode::new("a", 0.0, 0.0, "f1"),
                GraphNode::new("b", 0.0, 0.0, "f2"),
            ],
            vec![
                GraphEdge::new("a", "b", 5.0, TraversalKind::Stairs),
                GraphEdge::new("a", "b", 8.0, TraversalKind::Elevator),
            ],
            vec![FloorInfo::new("f1", 1), FloorInfo::new("f2", 2)],
        )
        .expect("valid graph");

        let huge = AccessibilityProfile::unrestricted().with_stairs_penalty(1e308);
        huge.validate().expect("finite penalty is valid");
        let path = find_route(&graph, "a", "b", &huge).expect("route");
        assert_eq!(path.edges(), &[1]);
        assert_eq!(path.cost(), 8.0);

        let avoided = AccessibilityProfile::avoid_stairs().with_stairs_penalty(1e306);
        let path = find_route_a_star(&graph, "a", "b", &avoided).expect("route");
        assert_eq!(path.edges(), &[1]);
    }

    #[test]
    fn infinite_costs_order_after_finite_ones() {
        assert_eq!(compare_cost(f64::INFINITY, 8.0), Ordering::Greater);
        assert_eq!(compare_cost(8.0, f64::INFINITY), Ordering::Less);
        assert_eq!(compare_cost(0.3, 0.1 + 0.2), Ordering::Equal);
    }

    #[test]
    fn a_star_matches_dijkstra_cost() {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for row in 0..6_i32 {
            for col in 0..6_i32 {
                nodes.push(GraphNode::new(
                    format!("n{row}{col}"),
                    f64::from(col),
                    f64::from(row),
                    "f1",
                ));
                if col > 0 {
                    edges.push(GraphEdge::new(
                        format!("n{row}{}", col - 1),
                        format!("n{row}{col}"),
                        1.0,
                        TraversalKind::Walk,
                    ));
                }
                if row > 0 {
                    edges.push(GraphEdge::new(
                        format!("n{}{col}", row - 1),
                        format!("n{row}{col}"),
                        1.0,
                        TraversalKind::Walk,
                    ));
                }
            }
        }
        let graph =
            MapGraph::new(nodes, edges, vec![FloorInfo::new("f1", 1)]).expect("valid graph");
        assert!(graph.is_planar_consistent());

        let profile = AccessibilityProfile::default();
        let dijkstra = find_route(&graph, "n00", "n55", &profile).expect("route");
        let a_star = find_route_a_star(&graph, "n00", "n55", &profile).expect("route");
        assert_eq!(dijkstra.cost(), 10.0);
        assert_eq!(a_star.cost(), dijkstra.cost());
        assert_eq!(a_star.hop_count(), 10);
    }
}
