//! Route command handler for planning accessible routes between locations.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use campus_nav_lib::{plan_route, AccessibilityProfile, RouteAlgorithm, RouteRequest};

use super::CampusContext;
use crate::output::OutputFormat;

/// Search algorithm names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    #[default]
    Dijkstra,
    AStar,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
        }
    }
}

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Starting location: node id or label, e.g. "Robotics Lab (101)".
    #[arg(long = "from")]
    pub from: String,
    /// Destination: node id or label.
    #[arg(long = "to")]
    pub to: String,
    /// Never use stairs.
    #[arg(long)]
    pub elevators_only: bool,
    /// Use stairs only when nothing else connects.
    #[arg(long)]
    pub avoid_stairs: bool,
    /// Multiplier applied to stair lengths (>= 1.0).
    #[arg(long)]
    pub stairs_penalty: Option<f64>,
    /// Search algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Dijkstra)]
    pub algorithm: AlgorithmArg,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RouteArgs {
    /// Accessibility profile described by the flags.
    pub fn profile(&self) -> AccessibilityProfile {
        let defaults = AccessibilityProfile::default();
        AccessibilityProfile {
            stairs_allowed: !self.avoid_stairs,
            elevators_only: self.elevators_only,
            stairs_penalty: self.stairs_penalty.unwrap_or(defaults.stairs_penalty),
        }
    }

    /// Convert CLI args to a library [`RouteRequest`].
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::new(self.from.as_str(), self.to.as_str())
            .with_profile(self.profile())
            .with_algorithm(self.algorithm.into())
    }
}

/// Plan the requested route and render it in the requested format.
pub fn render_route_command(context: &CampusContext, args: &RouteArgs) -> Result<String> {
    let request = args.to_request();
    let plan = plan_route(&context.graph, &request, &context.config)
        .with_context(|| format!("failed to plan a route from {} to {}", args.from, args.to))?;
    args.format.render(&context.graph, &plan)
}

/// Handle the route subcommand.
pub fn handle_route_command(context: &CampusContext, args: &RouteArgs) -> Result<()> {
    print!("{}", render_route_command(context, args)?);
    Ok(())
}
