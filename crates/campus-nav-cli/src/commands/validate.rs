//! `validate` command: build the graph and report what it contains.

use std::fmt::Write;

use campus_nav_lib::TraversalKind;

use super::CampusContext;

/// Summary printed by `campus-nav validate`.
pub fn render_validation(context: &CampusContext) -> String {
    let graph = &context.graph;
    let count = |kind: TraversalKind| {
        graph
            .edges()
            .iter()
            .filter(|edge| edge.kind() == kind)
            .count()
    };

    let mut buffer = String::new();
    let _ = writeln!(buffer, "Campus: {}", context.campus.name);
    let _ = writeln!(buffer, "buildings: {}", context.campus.buildings.len());
    let _ = writeln!(buffer, "floors: {}", graph.floor_count());
    let _ = writeln!(buffer, "nodes: {}", graph.node_count());
    let _ = writeln!(
        buffer,
        "edges: {} (walk {}, stairs {}, elevator {}, ramp {})",
        graph.edge_count(),
        count(TraversalKind::Walk),
        count(TraversalKind::Stairs),
        count(TraversalKind::Elevator),
        count(TraversalKind::Ramp)
    );
    if !graph.is_planar_consistent() {
        let _ = writeln!(
            buffer,
            "note: some edges are shorter than the straight line between their endpoints; \
             A* searches fall back to Dijkstra"
        );
    }
    buffer
}

pub fn handle_validate(context: &CampusContext) {
    print!("{}", render_validation(context));
}
