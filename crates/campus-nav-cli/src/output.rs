//! Output formatting for route rendering.

use anyhow::{Context, Result};
use clap::ValueEnum;

use campus_nav_lib::{MapGraph, RoutePlan, RouteRenderMode, RouteSummary};

/// How the `route` command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Header plus numbered instructions.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// The full plan as pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Render a planned route. The result always ends with a newline.
    pub fn render(self, graph: &MapGraph, plan: &RoutePlan) -> Result<String> {
        match self {
            OutputFormat::Text => {
                Ok(RouteSummary::from_plan(graph, plan).render(RouteRenderMode::PlainText))
            }
            OutputFormat::Rich => {
                Ok(RouteSummary::from_plan(graph, plan).render(RouteRenderMode::RichText))
            }
            OutputFormat::Json => {
                let mut json =
                    serde_json::to_string_pretty(plan).context("failed to serialize route plan")?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}
