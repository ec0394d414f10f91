//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use campus_nav_lib::{
    build_graph, load_campus, Campus, FloorInfo, GraphBuildOptions, GraphEdge, GraphNode,
    MapGraph, TraversalKind,
};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the two-building sample campus.
#[allow(dead_code)]
pub fn sample_campus_path() -> PathBuf {
    fixtures_dir().join("sample_campus.json")
}

#[allow(dead_code)]
pub fn sample_campus() -> Campus {
    load_campus(&sample_campus_path()).expect("sample campus loads")
}

#[allow(dead_code)]
pub fn sample_graph() -> MapGraph {
    build_graph(&sample_campus(), &GraphBuildOptions::default()).expect("sample campus builds")
}

/// Two landings `a` (floor 1) and `b` (floor 2) joined by a stair of
/// length 5 and, optionally, an elevator of length 8.
#[allow(dead_code)]
pub fn stairs_and_elevator(with_elevator: bool) -> MapGraph {
    let mut edges =
        vec![GraphEdge::new("a", "b", 5.0, TraversalKind::Stairs).with_connector("Stair")];
    if with_elevator {
        edges.push(GraphEdge::new("a", "b", 8.0, TraversalKind::Elevator).with_connector("Lift"));
    }
    MapGraph::new(
        vec![
            GraphNode::new("a", 0.0, 0.0, "floor-1").with_label("Landing A"),
            GraphNode::new("b", 0.0, 0.0, "floor-2").with_label("Landing B"),
        ],
        edges,
        vec![FloorInfo::new("floor-1", 1), FloorInfo::new("floor-2", 2)],
    )
    .expect("valid graph")
}
