use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::campus::{Building, Campus, FloorPlan, Link, Poi, PoiRole};
use crate::config::GraphBuildOptions;
use crate::error::BuildError;
use crate::graph::{
    FloorId, FloorInfo, GraphEdge, GraphNode, MapGraph, NodeId, NodeRole, TraversalKind,
};

/// Build the routing graph for a campus.
///
/// Construction is all-or-nothing: the first malformed feature aborts the
/// build and no partial graph is produced.
pub fn build_graph(campus: &Campus, options: &GraphBuildOptions) -> Result<MapGraph, BuildError> {
    options
        .validate()
        .map_err(|message| BuildError::InvalidOptions { message })?;

    let mut builder = GraphAssembly::default();

    for building in &campus.buildings {
        for plan in &building.floors {
            builder.add_floor(plan, Some(building))?;
        }
    }
    if let Some(grounds) = &campus.grounds {
        builder.add_floor(grounds, None)?;
    }

    for building in &campus.buildings {
        for plan in &building.floors {
            builder.add_floor_nodes(plan)?;
        }
        for poi in &building.pois {
            builder.add_poi(building, poi)?;
        }
    }
    if let Some(grounds) = &campus.grounds {
        builder.add_floor_nodes(grounds)?;
    }

    for building in &campus.buildings {
        for plan in &building.floors {
            for link in &plan.links {
                builder.add_link(link, Some(plan), options)?;
            }
        }
    }
    if let Some(grounds) = &campus.grounds {
        for link in &grounds.links {
            builder.add_link(link, Some(grounds), options)?;
        }
    }
    for link in &campus.links {
        builder.add_link(link, None, options)?;
    }

    for building in &campus.buildings {
        builder.add_vertical_connectors(building, options)?;
    }

    let GraphAssembly {
        nodes,
        edges,
        floors,
        ..
    } = builder;
    let graph = MapGraph::new(nodes, edges, floors)?;

    debug!(
        campus = %campus.name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        floors = graph.floor_count(),
        planar_consistent = graph.is_planar_consistent(),
        "built campus graph"
    );

    Ok(graph)
}

#[derive(Default)]
struct GraphAssembly {
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    floors: Vec<FloorInfo>,
    floor_index: HashMap<String, usize>,
}

impl GraphAssembly {
    fn add_floor(
        &mut self,
        plan: &FloorPlan,
        building: Option<&Building>,
    ) -> Result<(), BuildError> {
        if self.floor_index.contains_key(&plan.id) {
            return Err(BuildError::DuplicateFloor {
                id: FloorId::new(plan.id.as_str()),
            });
        }
        self.floor_index.insert(plan.id.clone(), self.floors.len());
        self.floors.push(FloorInfo {
            id: FloorId::new(plan.id.as_str()),
            level: plan.level,
            building: building.map(|b| b.id.clone()),
            name: plan.name.clone(),
        });
        Ok(())
    }

    fn add_floor_nodes(&mut self, plan: &FloorPlan) -> Result<(), BuildError> {
        for room in &plan.rooms {
            let mut node = GraphNode::new(room.id.as_str(), room.x, room.y, plan.id.as_str())
                .with_role(NodeRole::Door);
            node.label = room.label();
            self.push_node(node)?;
        }
        for junction in &plan.junctions {
            self.push_node(GraphNode::new(
                junction.id.as_str(),
                junction.x,
                junction.y,
                plan.id.as_str(),
            ))?;
        }
        Ok(())
    }

    fn add_poi(&mut self, building: &Building, poi: &Poi) -> Result<(), BuildError> {
        let on_building_floor = building.floors.iter().any(|plan| plan.id == poi.floor);
        if !on_building_floor {
            return Err(BuildError::UnknownFloor {
                referenced_by: format!("poi {} in building {}", poi.id, building.id),
                floor: FloorId::new(poi.floor.as_str()),
            });
        }

        let role = match poi.role {
            PoiRole::Stairs => NodeRole::Stairs,
            PoiRole::Elevator => NodeRole::Elevator,
            PoiRole::Ramp => NodeRole::Ramp,
            PoiRole::Entrance => NodeRole::Entrance,
            PoiRole::Amenity => NodeRole::Amenity,
        };
        let mut node =
            GraphNode::new(poi.id.as_str(), poi.x, poi.y, poi.floor.as_str()).with_role(role);
        node.label = poi.name.clone().or_else(|| poi.connector.clone());
        self.push_node(node)
    }

    fn push_node(&mut self, node: GraphNode) -> Result<(), BuildError> {
        if self.node_index.contains_key(node.id.as_str()) {
            return Err(BuildError::DuplicateNode { id: node.id });
        }
        self.node_index
            .insert(node.id.as_str().to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn resolve(&self, link: &Link, endpoint: &str) -> Result<&GraphNode, BuildError> {
        self.node_index
            .get(endpoint)
            .and_then(|&index| self.nodes.get(index))
            .ok_or_else(|| BuildError::DanglingEdge {
                from: NodeId::new(link.from.as_str()),
                to: NodeId::new(link.to.as_str()),
                missing: NodeId::new(endpoint),
            })
    }

    fn add_link(
        &mut self,
        link: &Link,
        plan: Option<&FloorPlan>,
        options: &GraphBuildOptions,
    ) -> Result<(), BuildError> {
        let from = self.resolve(link, &link.from)?;
        let to = self.resolve(link, &link.to)?;

        if let Some(plan) = plan {
            if from.floor.as_str() != plan.id || to.floor.as_str() != plan.id {
                return Err(BuildError::CrossFloorLink {
                    from: from.id.clone(),
                    to: to.id.clone(),
                    floor: FloorId::new(plan.id.as_str()),
                });
            }
        }

        // Declared stairs and elevators without a length cost the same per
        // floor as synthesized connector edges.
        let length = match (link.length, link.kind) {
            (Some(length), _) => length,
            (None, TraversalKind::Stairs) => {
                options.stairs_cost_per_floor * f64::from(self.floors_between(from, to))
            }
            (None, TraversalKind::Elevator) => {
                options.elevator_cost_per_floor * f64::from(self.floors_between(from, to))
            }
            (None, TraversalKind::Walk | TraversalKind::Ramp) => from.planar_distance(to),
        };
        let mut edge = GraphEdge::new(from.id.clone(), to.id.clone(), length, link.kind);
        edge.attrs.one_way = link.one_way;
        self.edges.push(edge);
        Ok(())
    }

    /// Level difference between two nodes' floors, at least one.
    fn floors_between(&self, a: &GraphNode, b: &GraphNode) -> u32 {
        let level = |node: &GraphNode| {
            self.floor_index
                .get(node.floor.as_str())
                .and_then(|&index| self.floors.get(index))
                .map(|floor| floor.level)
                .unwrap_or_default()
        };
        level(a).abs_diff(level(b)).max(1)
    }

    /// Link every stair/elevator landing to the next landing of the same
    /// connector, ordered by floor level.
    fn add_vertical_connectors(
        &mut self,
        building: &Building,
        options: &GraphBuildOptions,
    ) -> Result<(), BuildError> {
        let mut connectors: BTreeMap<&str, Vec<&Poi>> = BTreeMap::new();
        for poi in &building.pois {
            if !matches!(poi.role, PoiRole::Stairs | PoiRole::Elevator) {
                continue;
            }
            match poi.connector.as_deref() {
                Some(name) => connectors.entry(name).or_default().push(poi),
                None => debug!(poi = %poi.id, "landing without connector id; no vertical edges"),
            }
        }

        for (name, landings) in connectors {
            let role = landings[0].role;
            if landings.iter().any(|poi| poi.role != role) {
                return Err(BuildError::MixedConnector {
                    connector: name.to_string(),
                });
            }
            let (kind, per_floor) = match role {
                PoiRole::Stairs => (TraversalKind::Stairs, options.stairs_cost_per_floor),
                _ => (TraversalKind::Elevator, options.elevator_cost_per_floor),
            };

            let mut ordered: Vec<(i32, &Poi)> = Vec::with_capacity(landings.len());
            for poi in landings {
                let level = self
                    .floor_index
                    .get(&poi.floor)
                    .and_then(|&index| self.floors.get(index))
                    .map(|floor| floor.level)
                    .ok_or_else(|| BuildError::UnknownFloor {
                        referenced_by: format!("connector {name}"),
                        floor: FloorId::new(poi.floor.as_str()),
                    })?;
                if ordered.iter().any(|(_, other)| other.floor == poi.floor) {
                    return Err(BuildError::DuplicateLanding {
                        connector: name.to_string(),
                        floor: FloorId::new(poi.floor.as_str()),
                    });
                }
                ordered.push((level, poi));
            }

            if ordered.len() < 2 {
                warn!(
                    building = %building.id,
                    connector = name,
                    "connector has a single landing; no vertical edges synthesized"
                );
                continue;
            }

            ordered.sort_by(|(la, a), (lb, b)| la.cmp(lb).then_with(|| a.id.cmp(&b.id)));
            for pair in ordered.windows(2) {
                let (lower_level, lower) = pair[0];
                let (upper_level, upper) = pair[1];
                let floors_crossed = upper_level.abs_diff(lower_level).max(1);
                self.edges.push(
                    GraphEdge::new(
                        lower.id.as_str(),
                        upper.id.as_str(),
                        per_floor * f64::from(floors_crossed),
                        kind,
                    )
                    .with_connector(name),
                );
            }
        }

        Ok(())
    }
}
