use std::fmt::Write;

use serde::Serialize;

use crate::graph::{FloorId, GraphNode, MapGraph, NodeId, TraversalKind};
use crate::route::Route;
use crate::routing::{RouteAlgorithm, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub id: NodeId,
    pub floor: FloorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteEndpoint {
    fn from_node(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            floor: node.floor.clone(),
            name: node.label.clone(),
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// One numbered instruction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub kind: TraversalKind,
    pub instruction: String,
    pub distance: f64,
}

/// Structured representation of a route that higher-level consumers can
/// serialise or render.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<RouteAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<RouteEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<RouteEndpoint>,
    pub distance: f64,
    pub eta_seconds: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Summary of a route on its own; endpoints come from its segments.
    pub fn from_route(route: &Route) -> Self {
        let steps = route
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| RouteStep {
                index: index + 1,
                kind: segment.kind,
                instruction: segment.instruction.clone(),
                distance: segment.distance,
            })
            .collect();

        Self {
            algorithm: None,
            start: route
                .segments
                .first()
                .map(|segment| RouteEndpoint::from_node(&segment.start)),
            destination: route
                .segments
                .last()
                .map(|segment| RouteEndpoint::from_node(&segment.end)),
            distance: route.distance,
            eta_seconds: route.eta_seconds,
            steps,
        }
    }

    /// Summary of a planned route with endpoint names resolved from the graph.
    pub fn from_plan(graph: &MapGraph, plan: &RoutePlan) -> Self {
        let mut summary = Self::from_route(&plan.route);
        summary.algorithm = Some(plan.algorithm);
        summary.start = graph
            .node(plan.start.as_str())
            .map(RouteEndpoint::from_node)
            .or(summary.start);
        summary.destination = graph
            .node(plan.destination.as_str())
            .map(RouteEndpoint::from_node)
            .or(summary.destination);
        summary
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn endpoints(&self) -> (&str, &str) {
        let start = self
            .start
            .as_ref()
            .map(RouteEndpoint::display_name)
            .unwrap_or("<start>");
        let destination = self
            .destination
            .as_ref()
            .map(RouteEndpoint::display_name)
            .unwrap_or(start);
        (start, destination)
    }

    fn algorithm_suffix(&self) -> String {
        self.algorithm
            .map(|algorithm| format!(", algorithm: {algorithm}"))
            .unwrap_or_default()
    }

    fn render_plain(&self) -> String {
        let (start, destination) = self.endpoints();
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} (distance {:.1}, eta {}, {} steps{})",
            start,
            destination,
            self.distance,
            format_eta(self.eta_seconds),
            self.steps.len(),
            self.algorithm_suffix()
        );
        if self.steps.is_empty() {
            let _ = writeln!(buffer, "You are already at {destination}.");
        }
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}. {} ({:.1})",
                step.index, step.instruction, step.distance
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let (start, destination) = self.endpoints();
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route**: _{} → {}_ (distance {:.1}, eta {}, {} steps{})",
            start,
            destination,
            self.distance,
            format_eta(self.eta_seconds),
            self.steps.len(),
            self.algorithm_suffix()
        );
        if self.steps.is_empty() {
            let _ = writeln!(buffer, "* You are already at **{destination}**.");
        }
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`, {:.1})",
                step.index, step.instruction, step.kind, step.distance
            );
        }
        buffer
    }
}

/// Render a route without plan context.
pub fn render_route(route: &Route, mode: RouteRenderMode) -> String {
    RouteSummary::from_route(route).render(mode)
}

/// "45 s", "3 min 05 s".
pub fn format_eta(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    if total < 60 {
        format!("{total} s")
    } else {
        format!("{} min {:02} s", total / 60, total % 60)
    }
}
